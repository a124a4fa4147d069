//! Aggregation module
//!
//! Month-granularity cost aggregation over subscription records.

mod engine;

pub use engine::{aggregate, contribution, is_candidate, overlap_months};
