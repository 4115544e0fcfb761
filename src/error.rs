use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort the whole batch.
#[derive(Error, Debug)]
pub enum GeotagError {
    #[error("Directory not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Expected a single GPX file, found {found} files in {folder:?}")]
    TrackFileCount { folder: PathBuf, found: usize },

    #[error("Expected a single GPX track, found {found} tracks in {file:?}")]
    TrackCount { file: PathBuf, found: usize },

    #[error("Fewer trackpoints than images: {trackpoints} trackpoints for {images} images in {folder:?}")]
    InsufficientTrackpoints {
        folder: PathBuf,
        trackpoints: usize,
        images: usize,
    },

    #[error("Non-finite coordinate in trackpoint: {0}")]
    NonFiniteCoordinate(f64),

    #[error("Could not build EXIF tag {tag}: {reason}")]
    Tag { tag: &'static str, reason: String },
}
