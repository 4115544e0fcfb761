//! Positional pairing of images with trackpoints.

use crate::error::GeotagError;
use crate::track::{Fix, Track};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Tag(Fix),
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    pub image: PathBuf,
    pub index: usize,
    pub decision: Decision,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub pairings: Vec<Pairing>,
    pub taggable: usize,
    pub skipped: usize,
}

/// Picks the only track file of a folder.
pub fn single_track_file<'a>(folder: &Path, files: &'a [PathBuf]) -> Result<&'a Path, GeotagError> {
    match files {
        [file] => Ok(file.as_path()),
        _ => Err(GeotagError::TrackFileCount {
            folder: folder.to_path_buf(),
            found: files.len(),
        }),
    }
}

/// Takes the only track out of a parsed track file.
pub fn single_track(file: &Path, mut tracks: Vec<Track>) -> Result<Track, GeotagError> {
    if tracks.len() != 1 {
        return Err(GeotagError::TrackCount {
            file: file.to_path_buf(),
            found: tracks.len(),
        });
    }
    Ok(tracks.remove(0))
}

/// Pairs the i-th image with the i-th trackpoint.
///
/// Fails before producing anything if there are fewer trackpoints than
/// images. More than `surplus_tolerance` extra trackpoints is only logged;
/// the extra points are never looked at.
pub fn align(
    folder: &Path,
    images: &[PathBuf],
    track: &Track,
    surplus_tolerance: usize,
) -> Result<Alignment, GeotagError> {
    if track.points.len() < images.len() {
        return Err(GeotagError::InsufficientTrackpoints {
            folder: folder.to_path_buf(),
            trackpoints: track.points.len(),
            images: images.len(),
        });
    }
    let surplus = track.points.len() - images.len();
    if surplus > surplus_tolerance {
        warn!(
            "{} more trackpoints than images in {:?}, extra points ignored",
            surplus, folder
        );
    }

    let mut alignment = Alignment::default();
    for (index, (image, point)) in images.iter().zip(&track.points).enumerate() {
        let decision = match point.fix() {
            Some(fix) => {
                alignment.taggable += 1;
                Decision::Tag(fix)
            }
            None => {
                alignment.skipped += 1;
                Decision::Skip
            }
        };
        alignment.pairings.push(Pairing {
            image: image.clone(),
            index,
            decision,
        });
    }
    Ok(alignment)
}
