//! assetgrep - command-line entry point

use anyhow::{Context, Result};
use assetgrep::{scan, AssetStore, CliArgs, PatternSet, ScanConfig, StdoutEmitter};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[-] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    // Reject bad arguments before any file is touched
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    setup_logging(config.verbose);

    let patterns = PatternSet::load()?;
    let store = AssetStore::new();

    scan(&config, &patterns, &store, &StdoutEmitter).context("Scan aborted")?;

    Ok(())
}

/// Diagnostics go to stderr; stdout carries only artifact values
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("assetgrep=debug,warn")
    } else {
        EnvFilter::new("assetgrep=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
