//! Discovery of the record fields a dashboard can group by.

use casestats_common::{humanize_field_name, CaseRecord};
use casestats_config::DatasetConfig;
use serde::Serialize;

/// A selectable grouping field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionOption {
    /// Record field name.
    pub field: String,
    /// Display label.
    pub label: String,
}

/// Grouping fields offered for a record set.
///
/// Taken from the first record, minus the configured ignored fields.
#[must_use]
pub fn dimension_options(records: &[CaseRecord], dataset: &DatasetConfig) -> Vec<DimensionOption> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    first
        .field_names()
        .into_iter()
        .filter(|field| !dataset.is_ignored_field(field))
        .map(|field| DimensionOption {
            field: field.to_string(),
            label: humanize_field_name(field),
        })
        .collect()
}

/// The dimension to use when none is requested.
///
/// A configured default wins; otherwise the first discovered option.
#[must_use]
pub fn default_dimension<'a>(
    options: &'a [DimensionOption],
    configured: Option<&'a str>,
) -> Option<&'a str> {
    configured.or_else(|| options.first().map(|option| option.field.as_str()))
}
