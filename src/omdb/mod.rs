//! Movie database module
//!
//! Defines the MovieSource trait and the OMDb client that implements it.

mod client;
mod traits;
mod wire;

pub use client::OmdbClient;
pub use traits::MovieSource;
