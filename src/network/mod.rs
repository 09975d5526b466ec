//! HTTP networking module
//!
//! Provides HTTP client functionality for making requests to the movie database.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{ApiRequest, ApiResponse};
