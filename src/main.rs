#![forbid(unsafe_code)]

mod cli;
mod config;
mod constants;
mod persistence;
mod snapshot;
mod transfer;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use config::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let settings = &loaded.settings;

    // LOG_LEVEL wins over the settings file, -v wins over both
    let env_level = std::env::var(constants::config::LOG_LEVEL_ENV).ok();
    let log_level = if cli.verbose {
        TraceLevel::DEBUG
    } else {
        settings.trace_level(env_level.as_deref())
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(path) = &loaded.path {
        info!(path = %path.display(), "Loaded settings");
    }
    for correction in &loaded.corrections {
        warn!(setting = correction.field, "{correction}");
    }
    debug!(settings = ?settings, "Using settings");

    cli::run(&cli.command, settings)
}
