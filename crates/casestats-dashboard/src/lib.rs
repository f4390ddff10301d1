//! # Casestats Dashboard
//!
//! Command line front end for the case statistics dashboard.
//!
//! Loads configuration and case records, runs the aggregation pipeline for
//! the selected controls, and prints the series as JSON or a text table.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;
pub mod input;
pub mod output;

pub use app::*;
pub use cli::*;
pub use error::*;
pub use input::*;
pub use output::*;
