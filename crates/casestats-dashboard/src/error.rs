//! Application-wide error types using thiserror.

use casestats_common::StatsError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Pipeline or configuration error.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Records file could not be read.
    #[error("Failed to read records from {path}: {source}")]
    ReadRecords {
        /// Records file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A JSON array of records did not parse.
    #[error("Invalid record array: {0}")]
    RecordArray(#[source] serde_json::Error),

    /// One line of a JSON lines file did not parse.
    #[error("Invalid record on line {line}: {source}")]
    RecordLine {
        /// One-based line number.
        line: usize,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),

    /// Requested breakdown bucket is past the axis.
    #[error("Bucket index {index} is out of range for {len} buckets")]
    BucketOutOfRange {
        /// Requested index.
        index: usize,
        /// Axis length.
        len: usize,
    },
}

/// Result type for the dashboard application.
pub type DashboardResult<T> = Result<T, DashboardError>;
