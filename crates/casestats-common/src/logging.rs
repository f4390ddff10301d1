//! Structured logging bootstrap for the dashboard binary

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::{Result, StatsError};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "casestats_series=trace")
    pub level: String,
    /// Compact single-line output instead of the default format
    pub compact: bool,
    /// Pretty multi-line output with colors
    pub pretty: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to emit span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            compact: false,
            pretty: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Build the env filter, preferring `RUST_LOG` over the configured level
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
///
/// Logs go to stderr so that stdout stays reserved for dashboard output.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let base = fmt::layer()
        .with_span_events(config.span_events())
        .with_target(config.include_targets);

    let outcome = match (&config.file_path, config.compact, config.pretty) {
        (Some(path), compact, _) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = base.with_ansi(false).with_writer(std::sync::Mutex::new(file));
            if compact {
                registry.with(layer.compact()).try_init()
            } else {
                registry.with(layer).try_init()
            }
        }
        (None, true, _) => registry
            .with(base.compact().with_writer(std::io::stderr))
            .try_init(),
        (None, false, true) => registry
            .with(base.pretty().with_writer(std::io::stderr))
            .try_init(),
        (None, false, false) => registry.with(base.with_writer(std::io::stderr)).try_init(),
    };

    outcome.map_err(|e| StatsError::with_source("Failed to install tracing subscriber", e))
}
