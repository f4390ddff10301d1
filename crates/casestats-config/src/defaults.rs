//! Default values: the literals of the source case dataset.

use crate::schema::{DashboardConfig, DatasetConfig};
use casestats_common::RangeMode;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            years: vec![2025, 2024, 2023],
            valid_measure: "received".to_string(),
            diversion_marker: "Diverted".to_string(),
            unknown_group: "Unknown".to_string(),
            month_names: strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            diversion_types: strings(&[
                "Mental Health Diversion (MHD)",
                "Drug Diversion Program",
                "Restorative Justice Program",
                "Other",
            ]),
            // U+2011 non-breaking hyphens, as spelled in the source spreadsheets
            decision_types: strings(&[
                "Prosecuted",
                "Diverted pre‑charge",
                "Diverted post‑charge",
                "Declined",
            ]),
            ignored_fields: strings(&["id", "date", "year", "month", "measure", "count"]),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_range: RangeMode::Monthly,
            default_metric: "all_cases".to_string(),
            default_dimension: None,
            palette: strings(&[
                "#000", "#e91e63", "#ff9800", "#ffeb3b", "#4caf50", "#00bcd4", "#9c27b0",
                "#f44336", "#3f51b5", "#2196f3", "#795548",
            ]),
        }
    }
}
