//! In-memory movie source for tests

use crate::error::FetchError;
use crate::omdb::MovieSource;
use crate::results::{DetailRecord, SearchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type SearchKey = (String, Option<String>);

#[derive(Default)]
pub(crate) struct FakeSource {
    searches: HashMap<SearchKey, Result<Vec<SearchResult>, FetchError>>,
    details: HashMap<String, Result<DetailRecord, FetchError>>,
    delays: HashMap<String, Duration>,
    detail_delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: &str, year: Option<&str>, results: Vec<SearchResult>) -> Self {
        self.searches
            .insert((term.to_string(), year.map(String::from)), Ok(results));
        self
    }

    pub fn with_search_error(mut self, term: &str, year: Option<&str>, err: FetchError) -> Self {
        self.searches
            .insert((term.to_string(), year.map(String::from)), Err(err));
        self
    }

    pub fn with_detail(mut self, record: DetailRecord) -> Self {
        self.details.insert(record.id.clone(), Ok(record));
        self
    }

    pub fn with_detail_error(mut self, id: &str, err: FetchError) -> Self {
        self.details.insert(id.to_string(), Err(err));
        self
    }

    /// Delay searches for `term` before answering
    pub fn with_delay(mut self, term: &str, delay: Duration) -> Self {
        self.delays.insert(term.to_string(), delay);
        self
    }

    /// Delay the detail lookup for `id` before answering
    pub fn with_detail_delay(mut self, id: &str, delay: Duration) -> Self {
        self.detail_delays.insert(id.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("i:").map(String::from))
            .collect()
    }
}

#[async_trait]
impl MovieSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(
        &self,
        term: &str,
        year: Option<&str>,
    ) -> Result<Vec<SearchResult>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("s:{}:{}", term, year.unwrap_or("")));

        if let Some(delay) = self.delays.get(term) {
            tokio::time::sleep(*delay).await;
        }

        if term.trim().is_empty() {
            return Err(FetchError::EmptyQuery);
        }
        self.searches
            .get(&(term.to_string(), year.map(String::from)))
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound("Movie not found!".to_string())))
    }

    async fn detail(&self, id: &str) -> Result<DetailRecord, FetchError> {
        self.calls.lock().unwrap().push(format!("i:{}", id));

        if let Some(delay) = self.detail_delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        self.details
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound("Incorrect IMDb ID.".to_string())))
    }
}

/// Poster-bearing search entry
pub(crate) fn movie(id: &str, title: &str, year: &str) -> SearchResult {
    SearchResult::new(id, title, year).with_poster(format!("https://img/{}.jpg", id))
}

/// Detail record for `movie(id, ..)` with the given rating text
pub(crate) fn detail(id: &str, title: &str, year: &str, rating: &str) -> DetailRecord {
    DetailRecord::from_summary(movie(id, title, year)).with_rating(rating)
}
