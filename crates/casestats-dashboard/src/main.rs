//! Casestats - Main Entry Point

use anyhow::{Context, Result};
use casestats_common::init_logging;
use casestats_dashboard::{load_config, run, Args};
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    info!("Starting casestats");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let output = runtime.block_on(run(&args, &config))?;

    println!("{output}");
    Ok(())
}
