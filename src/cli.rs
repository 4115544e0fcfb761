use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "timelapse_geotag")]
#[command(about = "geotag time-lapse image sequences from their GPX track")]
pub struct Cli {
    #[arg(short = 'e', long, default_value = "jpg", value_delimiter = ',')]
    pub suffix: Vec<String>,

    /// Glob matching sequence folder names under the root
    #[arg(long, default_value = "G*")]
    pub folder_pattern: String,

    /// Trackpoints beyond the image count tolerated without a warning
    #[arg(long, default_value_t = 10)]
    pub surplus_tolerance: usize,

    /// Milliseconds added to trackpoints that repeat the previous timestamp
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(i64).range(1..=60_000))]
    pub interval_ms: i64,

    #[arg(long, default_value = crate::utils::DEFAULT_MAKE)]
    pub make: String,

    #[arg(long, default_value = crate::utils::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value = crate::utils::DEFAULT_DESCRIPTION)]
    pub description: String,

    /// Report what would be tagged without touching any image
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// geotag every sequence folder under a root directory
    Geotag {
        #[arg(required = true)]
        root: PathBuf,
    },
    /// geotag a single sequence folder
    Sequence {
        #[arg(required = true)]
        folder: PathBuf,
    },
}
