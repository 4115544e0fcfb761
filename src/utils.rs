use crate::error::GeotagError;
use crate::exif::Device;
use anyhow::{Context, Result};
use chrono::Duration;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// --- Constants & Config ---

pub const DEFAULT_MAKE: &str = "GoPro";
pub const DEFAULT_MODEL: &str = "GoPro Max";
pub const DEFAULT_DESCRIPTION: &str = "Sampled From TimeLapse Video";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub suffixes: Vec<String>,
    pub folder_pattern: String,
    /// Extra trackpoints beyond the image count tolerated without a warning.
    pub surplus_tolerance: usize,
    /// Offset applied to trackpoints sharing a timestamp.
    pub interval: Duration,
    pub device: Device,
    pub dry_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            suffixes: vec!["jpg".to_string()],
            folder_pattern: "G*".to_string(),
            surplus_tolerance: 10,
            interval: Duration::milliseconds(500),
            device: Device {
                make: DEFAULT_MAKE.to_string(),
                model: DEFAULT_MODEL.to_string(),
                description: DEFAULT_DESCRIPTION.to_string(),
            },
            dry_run: false,
        }
    }
}

// --- Helpers ---

pub fn resolve_dir(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(GeotagError::NotFound(path.to_path_buf()).into());
    }
    fs::canonicalize(path).with_context(|| format!("Failed to canonicalize {:?}", path))
}

/// Directories directly under `root` whose name matches `pattern`, sorted.
pub fn sequence_folders(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root_str = root.to_str().context("Path not UTF-8")?;
    let full = format!("{}/{}", glob::Pattern::escape(root_str), pattern);

    let mut folders = Vec::new();
    for entry in glob::glob(&full).with_context(|| format!("Invalid folder pattern {:?}", pattern))? {
        let path = entry?;
        if path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort();
    Ok(folders)
}

/// Images and GPX files of one folder, not recursing, sorted by file name.
pub fn folder_files(dir: &Path, config: &AppConfig) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut images = Vec::new();
    let mut gpx_files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();

            if ext == "gpx" {
                gpx_files.push(path.to_path_buf());
            } else if config.suffixes.contains(&ext) {
                images.push(path.to_path_buf());
            }
        }
    }
    (images, gpx_files)
}
