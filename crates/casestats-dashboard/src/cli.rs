//! Command line arguments and their resolution into a dashboard request.

use casestats_common::RangeMode;
use casestats_config::Config;
use casestats_series::{default_dimension, DashboardRequest, DimensionOption};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty printed JSON for a renderer.
    #[default]
    Json,
    /// Plain text table.
    Table,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "casestats", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CASESTATS_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Case records as a JSON array or JSON lines
    #[arg(short, long)]
    pub records: PathBuf,

    /// Range mode: monthly, quarterly, annual or last12
    #[arg(long)]
    pub range: Option<String>,

    /// Record field to group by
    #[arg(short, long)]
    pub dimension: Option<String>,

    /// Metric id to display
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Metric id to show as a percentage of the metric
    #[arg(long)]
    pub numerator: Option<String>,

    /// Show the total line with a per-bucket group breakdown
    #[arg(long)]
    pub breakdown: bool,

    /// Bucket index whose breakdown is printed (defaults to the latest)
    #[arg(long, requires = "breakdown")]
    pub bucket: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// List the selectable dimensions and exit
    #[arg(long)]
    pub list_dimensions: bool,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Builds the dashboard request, filling unset controls from configuration.
    ///
    /// An unknown range id falls back to monthly. Without any dimension the
    /// records all land in the unknown group.
    #[must_use]
    pub fn to_request(&self, config: &Config, options: &[DimensionOption]) -> DashboardRequest {
        let range = self
            .range
            .as_deref()
            .map_or(config.dashboard.default_range, RangeMode::from_id_lenient);
        let metric = self
            .metric
            .clone()
            .unwrap_or_else(|| config.dashboard.default_metric.clone());
        let dimension = self
            .dimension
            .as_deref()
            .or_else(|| default_dimension(options, config.dashboard.default_dimension.as_deref()))
            .unwrap_or_default()
            .to_string();

        DashboardRequest {
            range,
            dimension,
            metric,
            numerator: self.numerator.clone(),
            breakdown: self.breakdown,
        }
    }
}
