//! # Casestats Common
//!
//! Shared types, utilities, and common functionality for the case statistics
//! dashboard.
//!
//! This crate provides the record model consumed by the aggregation pipeline,
//! the workspace error type, and the logging bootstrap used by the binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod macros;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, StatsError};
pub use logging::{init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
