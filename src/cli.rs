//! Command-line front end
//!
//! Loads the two setup files, runs the transfer and writes the result. All
//! user-facing output goes to stdout, logs go to stderr.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Settings;
use crate::constants::messages;
use crate::persistence::{default_output_file_name, default_output_path, load_snapshot, save_snapshot};
use crate::snapshot::{LinkId, Snapshot};
use crate::transfer::{self, resolve_selection, TransferRequest, TransferReport};

#[derive(Debug, Parser)]
#[command(
    name = "spectera-transfer",
    version,
    about = "Transfer device settings from one Spectera base station setup to another"
)]
pub struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the paired devices of a setup file
    List {
        /// Setup file exported from a base station
        file: PathBuf,
    },
    /// Copy device settings and routing from a source setup into a target setup
    Transfer(TransferArgs),
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Setup of the original base station (current settings)
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Setup of the destination base station (re-paired devices)
    #[arg(short, long, value_name = "FILE")]
    pub target: PathBuf,

    /// UID of a source device to transfer, repeatable
    #[arg(short = 'd', long = "device", value_name = "UID", conflicts_with = "all")]
    pub devices: Vec<String>,

    /// Transfer every device of the source setup
    #[arg(short, long)]
    pub all: bool,

    /// Output file (default: timestamped file next to the source)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Indent the output file
    #[arg(long)]
    pub pretty: bool,

    /// Run the transfer and report, but do not write anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write output even if the target has no paired devices (UIDs are kept)
    #[arg(long)]
    pub allow_empty_target: bool,
}

pub fn run(command: &Command, settings: &Settings) -> Result<()> {
    match command {
        Command::List { file } => list(file),
        Command::Transfer(args) => run_transfer(args, settings),
    }
}

fn list(file: &Path) -> Result<()> {
    let snapshot = load_snapshot(file)?;
    for line in describe_devices(&snapshot) {
        println!("{line}");
    }
    Ok(())
}

/// Device listing, one line per device plus the device count
pub fn describe_devices(snapshot: &Snapshot) -> Vec<String> {
    let link = |id: Option<LinkId>| id.map_or_else(|| "-".to_string(), |id| id.to_string());

    let mut lines: Vec<String> = snapshot
        .peripherals
        .iter()
        .enumerate()
        .map(|(index, device)| {
            format!(
                "{index}: {}  iem={} mic={}",
                device.label(),
                link(device.iem_link()),
                link(device.mic_link())
            )
        })
        .collect();
    lines.push(format!("Number of Portable devices available: {}", snapshot.peripherals.len()));
    lines
}

/// Turn `--device`/`--all` into a transfer request
pub fn build_request(args: &TransferArgs, source: &Snapshot) -> Result<TransferRequest> {
    if args.all {
        return Ok(TransferRequest::all());
    }
    Ok(TransferRequest::selected(resolve_selection(source, &args.devices)?))
}

/// Explicit `--output`, or `<prefix>_<timestamp>.json` in the configured/source directory
pub fn output_path(args: &TransferArgs, settings: &Settings) -> PathBuf {
    match &args.output {
        Some(path) => path.clone(),
        None => {
            let file_name = default_output_file_name(&settings.file_prefix, &Local::now());
            default_output_path(&args.source, settings.output_dir.as_deref(), &file_name)
        }
    }
}

fn run_transfer(args: &TransferArgs, settings: &Settings) -> Result<()> {
    let source = load_snapshot(&args.source).context("Failed to load source file")?;
    let target = load_snapshot(&args.target).context("Failed to load target file")?;
    info!(available = target.peripherals.len(), "Target devices available");

    let request = build_request(args, &source)?;
    let result = transfer::transfer(&source, &target, &request)?;

    if result.report.has_no_target_peripherals() && !args.allow_empty_target {
        bail!("{}", messages::NO_TARGET_DEVICES_WORKFLOW);
    }
    for condition in &result.report.conditions {
        warn!(%condition, "Transfer condition");
        println!("Warning: {condition}");
    }
    if let Some((mapped, requested)) = result.report.partial_mapping() {
        info!(mapped, kept = requested - mapped, "Devices past the end of the target keep their UID");
    }

    for line in describe_mapping(&result.report) {
        println!("{line}");
    }

    let path = output_path(args, settings);
    if args.dry_run {
        println!("Dry run: not writing {}", path.display());
    } else {
        save_snapshot(&result.snapshot, &path, args.pretty || settings.pretty_output)?;
        println!("Output file saved successfully: {}", path.display());
    }

    println!("Operation: {}", result.report.summary());
    println!("Devices: {}", result.snapshot.peripherals.len());
    Ok(())
}

/// `A -> X` lines for every mapped UID
pub fn describe_mapping(report: &TransferReport) -> Vec<String> {
    report
        .mapping
        .iter()
        .map(|(source, destination)| {
            if *source == destination.key {
                format!("  {source} (kept)")
            } else {
                format!("  {source} -> {}", destination.key)
            }
        })
        .collect()
}
