use anyhow::Result;
use chrono::Duration;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod align;
mod angle;
mod cli;
mod commands;
mod error;
mod exif;
mod rational;
mod track;
mod utils;

use cli::{Cli, Commands};
use commands::geotag::{cmd_geotag, cmd_sequence};
use exif::Device;
use utils::AppConfig;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timelapse_geotag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig {
        suffixes: cli.suffix.iter().map(|s| s.to_lowercase()).collect(),
        folder_pattern: cli.folder_pattern.clone(),
        surplus_tolerance: cli.surplus_tolerance,
        interval: Duration::milliseconds(cli.interval_ms),
        device: Device {
            make: cli.make.clone(),
            model: cli.model.clone(),
            description: cli.description.clone(),
        },
        dry_run: cli.dry_run,
    };
    debug!("{:?}", config);

    match &cli.command {
        Commands::Geotag { root } => cmd_geotag(&config, root)?,
        Commands::Sequence { folder } => cmd_sequence(&config, folder)?,
    }

    Ok(())
}
