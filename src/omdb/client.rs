//! OMDb API client

use super::traits::MovieSource;
use super::wire::{DetailEnvelope, SearchEnvelope};
use crate::config::OmdbSettings;
use crate::error::FetchError;
use crate::network::{ApiRequest, ApiResponse, HttpClient};
use crate::results::{DetailRecord, SearchResult};
use async_trait::async_trait;
use tracing::debug;

/// Movie source backed by an OMDb-compatible HTTP API
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(http: HttpClient, settings: &OmdbSettings) -> Self {
        Self {
            http,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Build `GET <base>?s=<term>[&y=<year>]&apikey=<key>`
    pub fn search_request(&self, term: &str, year: Option<&str>) -> ApiRequest {
        let mut request = ApiRequest::get(&self.base_url).param("s", term);
        if let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) {
            request = request.param("y", year);
        }
        request.param("apikey", &self.api_key)
    }

    /// Build `GET <base>?i=<id>&apikey=<key>`
    pub fn detail_request(&self, id: &str) -> ApiRequest {
        ApiRequest::get(&self.base_url)
            .param("i", id)
            .param("apikey", &self.api_key)
    }

    fn parse_search(response: ApiResponse) -> Result<Vec<SearchResult>, FetchError> {
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        let envelope: SearchEnvelope = response.json()?;
        if let Some(ref total) = envelope.total_results {
            debug!("search reported {} total results", total);
        }
        envelope.into_results()
    }

    fn parse_detail(response: ApiResponse) -> Result<DetailRecord, FetchError> {
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        response.json::<DetailEnvelope>()?.into_record()
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn search(
        &self,
        term: &str,
        year: Option<&str>,
    ) -> Result<Vec<SearchResult>, FetchError> {
        if term.trim().is_empty() {
            return Err(FetchError::EmptyQuery);
        }
        let response = self.http.execute(self.search_request(term, year)).await?;
        Self::parse_search(response)
    }

    async fn detail(&self, id: &str) -> Result<DetailRecord, FetchError> {
        let response = self.http.execute(self.detail_request(id)).await?;
        Self::parse_detail(response)
    }
}
