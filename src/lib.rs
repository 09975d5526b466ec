//! Marquee: a movie browsing service over an OMDb-style API
//!
//! Searches the movie database, enriches and filters results with detail
//! lookups, samples a deduplicated "movies from year X" panel and ranks it
//! by rating.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod network;
pub mod omdb;
pub mod results;
pub mod session;
pub mod web;

pub use aggregate::Aggregator;
pub use config::Settings;
pub use error::FetchError;
pub use omdb::{MovieSource, OmdbClient};
pub use results::{DetailRecord, Filter, Outcome, SearchResult};
pub use session::Controller;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
