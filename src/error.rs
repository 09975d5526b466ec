//! Fetch error taxonomy
//!
//! Every call to the movie database resolves to either data or one of these
//! errors. None of them is fatal: callers degrade to an empty or partial
//! result and report the error back as a diagnostic.

use serde::Serialize;
use thiserror::Error;

/// Why a single call to the movie database produced no data
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// Network, DNS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status from the API
    #[error("HTTP error: {0}")]
    Status(u16),
    /// Response body could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),
    /// The API answered `Response: "False"`
    #[error("not found: {0}")]
    NotFound(String),
    /// Blank or whitespace-only search term
    #[error("empty query")]
    EmptyQuery,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport("request timed out".to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
