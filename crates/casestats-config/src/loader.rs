//! Configuration loading utilities

use crate::Config;
use casestats_common::{RangeMode, Result as StatsResult, StatsError};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "CASESTATS_CONFIG_PATH";

/// File names probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["casestats.yaml", "casestats.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Invalid(#[from] StatsError),
}

impl From<ConfigError> for StatsError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(inner) => inner,
            other => Self::config_with_source(other.to_string(), other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, an override cannot be
    /// parsed, or the result does not validate.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&content)?;
        debug!(path = %path.as_ref().display(), "Parsed configuration file");

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text without overrides or validation
    ///
    /// # Errors
    ///
    /// Fails when the text is not valid YAML for the schema.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration, discovering the file the way the binary does
    ///
    /// Order: an explicit path, `CASESTATS_CONFIG_PATH`, `casestats.yaml`,
    /// `casestats.yml`, then built-in defaults. Environment overrides apply
    /// in every case.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load(explicit: Option<&Path>) -> StatsResult<Config> {
        if let Some(path) = explicit {
            return Ok(Self::load_config(path)?);
        }
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Ok(Self::load_config(path)?);
        }
        if let Some(path) = DEFAULT_CONFIG_FILES.iter().find(|p| Path::new(p).exists()) {
            return Ok(Self::load_config(path)?);
        }

        info!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`
    ///
    /// Recognised variables: `CASESTATS_YEARS` (comma separated),
    /// `CASESTATS_VALID_MEASURE`, `CASESTATS_DEFAULT_RANGE`,
    /// `CASESTATS_DEFAULT_METRIC`, `CASESTATS_LOG_LEVEL`.
    ///
    /// # Errors
    ///
    /// Fails when a year list or range mode cannot be parsed.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(years) = lookup("CASESTATS_YEARS") {
            config.dataset.years = years
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<i32>)
                .collect::<Result<_, _>>()
                .map_err(|e| ConfigError::EnvParseError {
                    var: "CASESTATS_YEARS".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(measure) = lookup("CASESTATS_VALID_MEASURE") {
            config.dataset.valid_measure = measure;
        }

        if let Some(range) = lookup("CASESTATS_DEFAULT_RANGE") {
            config.dashboard.default_range =
                range.parse::<RangeMode>().map_err(|e| ConfigError::EnvParseError {
                    var: "CASESTATS_DEFAULT_RANGE".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(metric) = lookup("CASESTATS_DEFAULT_METRIC") {
            config.dashboard.default_metric = metric;
        }

        if let Some(level) = lookup("CASESTATS_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
