//! Configuration schema definitions using serde.

use casestats_common::{LoggingConfig, RangeMode};
use serde::{Deserialize, Serialize};

/// Main configuration structure for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vocabulary and shape of the case dataset.
    pub dataset: DatasetConfig,
    /// Dashboard control defaults and presentation.
    pub dashboard: DashboardConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Dataset configuration: the literals the aggregation pipeline recognises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Configured years, most recent first.
    pub years: Vec<i32>,
    /// Measure tag a record must carry to be counted.
    pub valid_measure: String,
    /// Prefix marking a decision as a diversion outcome.
    pub diversion_marker: String,
    /// Group label used when the dimension field is absent or empty.
    pub unknown_group: String,
    /// Short month names, January first.
    pub month_names: Vec<String>,
    /// Known diversion programme literals.
    pub diversion_types: Vec<String>,
    /// Known decision outcome literals.
    pub decision_types: Vec<String>,
    /// Record fields never offered as a grouping dimension.
    pub ignored_fields: Vec<String>,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Range mode used when none is requested.
    pub default_range: RangeMode,
    /// Metric id used when none is requested.
    pub default_metric: String,
    /// Dimension used when none is requested; first discovered field if unset.
    pub default_dimension: Option<String>,
    /// Series colors; the first entry is reserved for the ALL series.
    pub palette: Vec<String>,
}

impl DatasetConfig {
    /// Configured years, oldest first.
    #[must_use]
    pub fn years_ascending(&self) -> Vec<i32> {
        let mut years = self.years.clone();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Short name of a month (1-12), `"???"` outside that range.
    #[must_use]
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|i| self.month_names.get(i as usize))
            .map_or("???", String::as_str)
    }

    /// Whether a record with this measure tag participates in counting.
    #[must_use]
    pub fn is_valid_measure(&self, measure: Option<&str>) -> bool {
        measure == Some(self.valid_measure.as_str())
    }

    /// Whether a decision value denotes a diversion.
    #[must_use]
    pub fn is_diversion(&self, decision: &str) -> bool {
        decision.starts_with(&self.diversion_marker)
    }

    /// The known diversion type matching a raw (untrimmed) value.
    #[must_use]
    pub fn known_diversion_type(&self, raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        self.diversion_types
            .iter()
            .find(|t| t.as_str() == trimmed)
            .map(String::as_str)
    }

    /// Whether a value is one of the known decision literals.
    #[must_use]
    pub fn is_decision_type(&self, value: &str) -> bool {
        self.decision_types.iter().any(|d| d == value)
    }

    /// Whether a field is excluded from dimension selection.
    #[must_use]
    pub fn is_ignored_field(&self, field: &str) -> bool {
        self.ignored_fields.iter().any(|f| f == field)
    }
}
