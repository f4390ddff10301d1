//! Record file loading.

use crate::error::{DashboardError, DashboardResult};
use casestats_common::CaseRecord;
use std::path::Path;
use tracing::{debug, instrument};

/// Reads case records from a file.
///
/// # Errors
///
/// Fails when the file cannot be read or a record does not parse.
#[instrument]
pub async fn load_records(path: &Path) -> DashboardResult<Vec<CaseRecord>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DashboardError::ReadRecords {
            path: path.to_path_buf(),
            source,
        })?;
    let records = parse_records(&text)?;
    debug!(count = records.len(), "Loaded case records");
    Ok(records)
}

/// Parses records from a JSON array or from JSON lines.
///
/// Blank lines are skipped in JSON lines input.
///
/// # Errors
///
/// Fails on the first record that does not parse.
pub fn parse_records(text: &str) -> DashboardResult<Vec<CaseRecord>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(DashboardError::RecordArray);
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| DashboardError::RecordLine {
                line: i + 1,
                source,
            })
        })
        .collect()
}
