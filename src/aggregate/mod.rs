//! Result aggregation module
//!
//! Issues requests to the movie source and merges, deduplicates, filters
//! and ranks what comes back.

mod executor;
mod seed;

#[cfg(test)]
pub(crate) mod fake;

pub use executor::{Aggregator, DEFAULT_CONCURRENCY, DEFAULT_ENRICH_CAP};
pub use seed::select_random_seed;
