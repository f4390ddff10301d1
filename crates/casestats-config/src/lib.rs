//! # Casestats Config
//!
//! Dataset vocabulary and dashboard settings for the case statistics
//! dashboard.
//!
//! This crate provides the configuration schema, its defaults (the literals of
//! the source dataset), YAML loading with environment overrides, and
//! validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
