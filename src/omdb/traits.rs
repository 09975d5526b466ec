//! Movie source trait

use crate::error::FetchError;
use crate::results::{DetailRecord, SearchResult};
use async_trait::async_trait;

/// External collaborator that answers title searches and detail lookups
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Source name, used in logs
    fn name(&self) -> &str;

    /// Search titles by term, optionally restricted to a release year
    async fn search(&self, term: &str, year: Option<&str>)
        -> Result<Vec<SearchResult>, FetchError>;

    /// Fetch the full record for one identifier
    async fn detail(&self, id: &str) -> Result<DetailRecord, FetchError>;
}
