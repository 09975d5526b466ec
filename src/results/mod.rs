//! Result types, filters and containers for movie results
//!
//! This module defines the core data model shared by the aggregator, the
//! interaction controller and the web layer.

mod container;
mod filter;
mod types;

pub use container::{dedup_by_id, FetchFailure, Outcome, UniquePool};
pub use filter::{Filter, RuntimeBucket};
pub use types::*;
