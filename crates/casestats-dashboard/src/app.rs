//! Application flow: configuration, records, pipeline, output.

use crate::cli::Args;
use crate::input::load_records;
use crate::output::{render_dimensions, render_view};
use anyhow::{Context, Result};
use casestats_config::{Config, ConfigLoader};
use casestats_series::{build_dashboard, dimension_options};
use tracing::info;

/// Loads configuration for the given arguments and applies the log level flag.
///
/// # Errors
///
/// Fails when the configuration cannot be loaded or does not validate.
pub fn load_config(args: &Args) -> Result<Config> {
    let mut config = ConfigLoader::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    Ok(config)
}

/// Runs one dashboard computation and returns the rendered output.
///
/// # Errors
///
/// Fails when the records cannot be loaded, the request cannot be answered,
/// or the output cannot be rendered.
pub async fn run(args: &Args, config: &Config) -> Result<String> {
    let records = load_records(&args.records)
        .await
        .with_context(|| format!("Failed to load records from {}", args.records.display()))?;
    info!(count = records.len(), "Records loaded");

    let options = dimension_options(&records, &config.dataset);
    if args.list_dimensions {
        return render_dimensions(&options, args.format).context("Failed to render dimensions");
    }

    let request = args.to_request(config, &options);
    info!(
        range = %request.range,
        dimension = %request.dimension,
        metric = %request.metric,
        "Building dashboard"
    );

    let view = build_dashboard(&records, &request, config).context("Failed to build dashboard")?;
    render_view(&view, args.format, args.bucket).context("Failed to render dashboard")
}
