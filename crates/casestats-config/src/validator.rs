//! Runtime validation of loaded configuration.

use crate::schema::{Config, DashboardConfig, DatasetConfig};
use casestats_common::{ensure_field, Result, StatsError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Hex color codes in short or long form (`#000`, `#e91e63`).
pub static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("Invalid hex color regex pattern")
});

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.dataset.validate()?;
        self.dashboard.validate()
    }
}

impl DatasetConfig {
    /// Validates the dataset vocabulary.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure_field!(!self.years.is_empty(), "dataset.years", "at least one year is required");
        ensure_field!(
            all_unique(self.years.iter()),
            "dataset.years",
            "years must not repeat"
        );
        ensure_field!(
            self.years.iter().all(|y| (1..=9999).contains(y)),
            "dataset.years",
            "years must be four-digit calendar years"
        );
        ensure_field!(
            self.month_names.len() == 12,
            "dataset.month_names",
            "expected 12 month names, got {}",
            self.month_names.len()
        );
        ensure_field!(
            !self.valid_measure.trim().is_empty(),
            "dataset.valid_measure",
            "valid measure cannot be empty"
        );
        ensure_field!(
            !self.diversion_marker.is_empty(),
            "dataset.diversion_marker",
            "diversion marker cannot be empty"
        );
        ensure_field!(
            !self.unknown_group.is_empty(),
            "dataset.unknown_group",
            "unknown group label cannot be empty"
        );
        ensure_field!(
            all_unique(self.diversion_types.iter()),
            "dataset.diversion_types",
            "diversion types must not repeat"
        );
        ensure_field!(
            all_unique(self.decision_types.iter()),
            "dataset.decision_types",
            "decision types must not repeat"
        );
        Ok(())
    }
}

impl DashboardConfig {
    /// Validates the dashboard settings.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure_field!(!self.palette.is_empty(), "dashboard.palette", "palette cannot be empty");
        if let Some(bad) = self.palette.iter().find(|c| !HEX_COLOR_REGEX.is_match(c)) {
            return Err(StatsError::validation_field(
                format!("invalid color '{bad}'"),
                "dashboard.palette",
            ));
        }
        ensure_field!(
            !self.default_metric.trim().is_empty(),
            "dashboard.default_metric",
            "default metric cannot be empty"
        );
        Ok(())
    }
}

fn all_unique<T: Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> bool {
    let mut seen = HashSet::new();
    values.into_iter().all(|v| seen.insert(v))
}
