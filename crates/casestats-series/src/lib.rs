//! # Casestats Series
//!
//! Temporal aggregation and metric series for the case statistics dashboard.
//!
//! Records are counted in one pass into keyed tables, the table answering the
//! selected metric is resolved, and the result is projected onto a time axis
//! of buckets as one series per dimension group.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod bucket;
pub mod dimensions;
pub mod metric;
pub mod pipeline;
pub mod series;

pub use aggregator::*;
pub use bucket::*;
pub use dimensions::*;
pub use metric::*;
pub use pipeline::*;
pub use series::*;
