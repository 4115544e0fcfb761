use crate::align::{align, single_track, single_track_file, Decision};
use crate::exif::{apply, describe, ExifImage, ImageMetadata};
use crate::track::{load_tracks, normalize};
use crate::utils::{folder_files, resolve_dir, sequence_folders, AppConfig};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt;
use std::ops::AddAssign;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of one sequence folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceReport {
    pub checked: usize,
    pub tagged: usize,
    pub skipped: usize,
}

impl fmt::Display for SequenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoTagged {}, skipped {}", self.tagged, self.skipped)
    }
}

impl AddAssign for SequenceReport {
    fn add_assign(&mut self, other: Self) {
        self.checked += other.checked;
        self.tagged += other.tagged;
        self.skipped += other.skipped;
    }
}

pub fn cmd_geotag(config: &AppConfig, root: &Path) -> Result<()> {
    let root = resolve_dir(root)?;
    let total = geotag_root(config, &root, |path| ExifImage::open(path))?;
    info!(
        "checked {} images, tagged {}, skipped {}",
        total.checked, total.tagged, total.skipped
    );
    Ok(())
}

pub fn cmd_sequence(config: &AppConfig, folder: &Path) -> Result<()> {
    let folder = resolve_dir(folder)?;
    geotag_sequence(config, &folder, |path| ExifImage::open(path))?;
    Ok(())
}

/// Processes every sequence folder under `root` in name order, stopping at
/// the first error.
pub fn geotag_root<M, F>(config: &AppConfig, root: &Path, mut open: F) -> Result<SequenceReport>
where
    M: ImageMetadata,
    F: FnMut(&Path) -> M,
{
    let folders = sequence_folders(root, &config.folder_pattern)?;
    println!(
        "Found {} sequence folders in {:?}",
        folders.len().to_string().bold(),
        root
    );

    let mut total = SequenceReport::default();
    for folder in folders {
        total += geotag_sequence(config, &folder, &mut open)?;
    }
    Ok(total)
}

/// Reads the folder's track, pairs it with the folder's images and writes
/// every taggable pairing.
pub fn geotag_sequence<M, F>(config: &AppConfig, folder: &Path, mut open: F) -> Result<SequenceReport>
where
    M: ImageMetadata,
    F: FnMut(&Path) -> M,
{
    let (images, gpx_files) = folder_files(folder, config);
    let gpx = single_track_file(folder, &gpx_files)?;
    let mut track = single_track(gpx, load_tracks(gpx)?)?;
    normalize(&mut track, config.interval);

    let alignment = align(folder, &images, &track, config.surplus_tolerance)?;

    println!(
        "Checking {} images in {:?} against track {}...",
        images.len(),
        folder,
        track.name.as_deref().unwrap_or("(unnamed)").bold()
    );

    for pairing in &alignment.pairings {
        let fix = match &pairing.decision {
            Decision::Tag(fix) => fix,
            Decision::Skip => {
                debug!(
                    "skipping {:?}: trackpoint {} has no usable fix",
                    pairing.image, pairing.index
                );
                continue;
            }
        };

        if config.dry_run {
            println!(
                "{}",
                format!(
                    "DRY-RUN: {:?} -> {} @ {}",
                    pairing.image,
                    describe(fix),
                    fix.time
                )
                .green()
            );
            continue;
        }

        let mut image = open(&pairing.image);
        apply(&mut image, &pairing.image, fix, None, &config.device)
            .with_context(|| format!("Failed to geotag {:?}", pairing.image))?;
    }

    let report = SequenceReport {
        checked: images.len(),
        tagged: alignment.taggable,
        skipped: alignment.skipped,
    };
    println!("{}", report.to_string().cyan());
    Ok(report)
}
