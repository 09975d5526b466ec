//! Aggregation pipeline: search, detail enrichment, deduplication, ranking

use crate::config::Settings;
use crate::error::FetchError;
use crate::omdb::MovieSource;
use crate::results::{
    dedup_by_id, DetailRecord, FetchFailure, Filter, Outcome, SearchResult, UniquePool,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of primary results enriched when a filter is applied
pub const DEFAULT_ENRICH_CAP: usize = 10;

/// Default bound on in-flight detail requests
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Coordinates requests to a movie source and merges their results
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn MovieSource>,
    enrich_cap: usize,
    max_concurrency: usize,
}

impl Aggregator {
    /// Create a new aggregator over a movie source
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self {
            source,
            enrich_cap: DEFAULT_ENRICH_CAP,
            max_concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Create an aggregator with caps taken from settings
    pub fn from_settings(source: Arc<dyn MovieSource>, settings: &Settings) -> Self {
        Self::new(source)
            .with_enrich_cap(settings.aggregator.enrich_cap)
            .with_concurrency(settings.outgoing.max_concurrent_requests)
    }

    /// Set how many primary results are enriched when filtering
    pub fn with_enrich_cap(mut self, cap: usize) -> Self {
        self.enrich_cap = cap;
        self
    }

    /// Set the bound on concurrent detail requests
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn enrich_cap(&self) -> usize {
        self.enrich_cap
    }

    /// Search for `term` and keep only poster-bearing entries.
    ///
    /// Never fails: a blank term or a failed request yields an empty
    /// outcome carrying the failure.
    pub async fn fetch_primary(&self, term: &str) -> Outcome<SearchResult> {
        let term = term.trim();
        let call = format!("search \"{}\"", term);

        if term.is_empty() {
            warn!("Ignoring blank search term");
            return Outcome::failed(FetchFailure::new(call, FetchError::EmptyQuery));
        }

        match self.source.search(term, None).await {
            Ok(entries) => {
                let total = entries.len();
                let items: Vec<SearchResult> = dedup_by_id(entries)
                    .into_iter()
                    .filter(SearchResult::has_poster)
                    .collect();
                debug!(
                    "{} returned {} results for '{}', {} with posters",
                    self.source.name(),
                    total,
                    term,
                    items.len()
                );
                Outcome::new(items)
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", term, e);
                Outcome::failed(FetchFailure::new(call, e))
            }
        }
    }

    /// Look up the full record for one identifier. Absent (`Err`) on failure.
    pub async fn fetch_detail(&self, id: &str) -> Result<DetailRecord, FetchFailure> {
        self.source.detail(id).await.map_err(|e| {
            warn!("Detail lookup for {} failed: {}", id, e);
            FetchFailure::new(format!("detail {}", id), e)
        })
    }

    /// Apply `filter` to the first `enrich_cap` results after fetching their
    /// detail. With no active filter, returns every input entry untouched
    /// and issues no request.
    pub async fn enrich_and_filter(
        &self,
        results: &[SearchResult],
        filter: &Filter,
    ) -> Outcome<DetailRecord> {
        if !filter.is_active() {
            return Outcome::new(
                results
                    .iter()
                    .cloned()
                    .map(DetailRecord::from_summary)
                    .collect(),
            );
        }

        let subset = &results[..results.len().min(self.enrich_cap)];
        debug!(
            "Enriching {} of {} results for filtering",
            subset.len(),
            results.len()
        );

        let mut outcome = Outcome::default();
        for (summary, lookup) in subset.iter().zip(self.fetch_details(subset).await) {
            match lookup {
                Ok(record) => {
                    let record = keep_poster(record, summary);
                    if filter.matches(&record) {
                        outcome.items.push(record);
                    }
                }
                Err(failure) => outcome.record_failure(failure),
            }
        }

        info!(
            "Filter kept {} of {} enriched results",
            outcome.len(),
            subset.len()
        );
        outcome
    }

    /// Sample up to `cap` unique poster-bearing movies from `year` by
    /// searching the seed terms in order. Stops issuing requests as soon as
    /// the cap is met, so later terms may never be searched.
    pub async fn build_year_panel(
        &self,
        year: &str,
        seed_terms: &[String],
        cap: usize,
    ) -> Outcome<SearchResult> {
        let year = year.trim();
        let mut outcome = Outcome::default();
        let mut pool = UniquePool::new();

        if cap == 0 {
            return outcome;
        }

        let source = &self.source;
        let batches = stream::iter(seed_terms).then(|term| async move {
            (term, source.search(term, Some(year)).await)
        });
        futures::pin_mut!(batches);

        while let Some((term, batch)) = batches.next().await {
            match batch {
                Ok(entries) => pool.extend_until(entries, cap),
                Err(e) => {
                    warn!("Year panel search '{}' ({}) failed: {}", term, year, e);
                    outcome.record_failure(FetchFailure::new(
                        format!("search \"{}\" year {}", term, year),
                        e,
                    ));
                }
            }

            if pool.len() >= cap {
                debug!("Year panel for {} reached cap {} at '{}'", year, cap, term);
                break;
            }
        }

        outcome.items = pool.into_vec();
        outcome
    }

    /// Fetch detail for up to `cap` pool entries and sort them by numeric
    /// rating, highest first. Ties keep their pool order. An entry whose
    /// lookup fails stays in the list with rating 0.
    pub async fn rank_by_rating(&self, pool: &[SearchResult], cap: usize) -> Outcome<DetailRecord> {
        let subset = &pool[..pool.len().min(cap)];
        let mut outcome = Outcome::default();

        for (summary, lookup) in subset.iter().zip(self.fetch_details(subset).await) {
            let record = match lookup {
                Ok(record) => keep_poster(record, summary),
                Err(failure) => {
                    outcome.record_failure(failure);
                    DetailRecord::from_summary(summary.clone())
                }
            };
            outcome.items.push(record);
        }

        outcome
            .items
            .sort_by(|a, b| b.numeric_rating.total_cmp(&a.numeric_rating));
        outcome
    }

    /// Detail lookups for `entries`, in input order regardless of completion order
    async fn fetch_details(
        &self,
        entries: &[SearchResult],
    ) -> Vec<Result<DetailRecord, FetchFailure>> {
        let ids: Vec<String> = entries.iter().map(|entry| entry.id.clone()).collect();
        stream::iter(ids.into_iter().map(|id| async move { self.fetch_detail(&id).await }))
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await
    }
}

/// Fall back to the search entry's poster when the detail record lacks one
fn keep_poster(mut record: DetailRecord, summary: &SearchResult) -> DetailRecord {
    if !record.has_poster() {
        record.poster_url = summary.poster_url.clone();
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fake::{detail, movie, FakeSource};
    use std::collections::HashSet;
    use std::time::Duration;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| id(i).to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_primary_drops_posterless() {
        let source = FakeSource::new().with_search(
            "heat",
            None,
            vec![
                movie("tt1", "Heat", "1995"),
                SearchResult::new("tt2", "Heat 2", "2026").with_poster("N/A"),
                SearchResult::new("tt3", "Heat Wave", "2001"),
            ],
        );
        let agg = Aggregator::new(Arc::new(source));

        let outcome = agg.fetch_primary("heat").await;
        assert_eq!(ids(&outcome.items, |m| m.id.as_str()), vec!["tt1"]);
        assert!(!outcome.has_failures());
    }

    #[tokio::test]
    async fn test_fetch_primary_fails_softly() {
        let source = FakeSource::new().with_search_error(
            "heat",
            None,
            FetchError::Transport("dns failure".into()),
        );
        let agg = Aggregator::new(Arc::new(source));

        let outcome = agg.fetch_primary("heat").await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.failures[0].error, FetchError::Transport("dns failure".into()));
    }

    #[tokio::test]
    async fn test_blank_term_issues_no_request() {
        let source = Arc::new(FakeSource::new());
        let agg = Aggregator::new(source.clone());

        let outcome = agg.fetch_primary("  ").await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.failures[0].error, FetchError::EmptyQuery);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_detail_absent_on_failure() {
        let source = FakeSource::new()
            .with_detail(detail("tt1", "Heat", "1995", "8.3"))
            .with_detail_error("tt2", FetchError::Status(500));
        let agg = Aggregator::new(Arc::new(source));

        assert_eq!(agg.fetch_detail("tt1").await.unwrap().numeric_rating, 8.3);
        let failure = agg.fetch_detail("tt2").await.unwrap_err();
        assert_eq!(failure.error, FetchError::Status(500));
        assert_eq!(failure.call, "detail tt2");
    }

    #[tokio::test]
    async fn test_enrich_without_filter_is_identity() {
        let source = Arc::new(FakeSource::new());
        let agg = Aggregator::new(source.clone()).with_enrich_cap(1);
        let input: Vec<_> = (0..3)
            .map(|i| movie(&format!("tt{}", i), "Title", "2000"))
            .collect();

        let outcome = agg.enrich_and_filter(&input, &Filter::new()).await;
        let summaries: Vec<SearchResult> = outcome.items.iter().map(|r| r.summary()).collect();
        assert_eq!(summaries, input);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batman_min_rating_scenario() {
        let source = Arc::new(
            FakeSource::new()
                .with_search(
                    "batman",
                    None,
                    vec![
                        movie("b1", "Batman Begins", "2005"),
                        movie("b2", "Batman Forever", "1995"),
                        movie("b3", "The Dark Knight", "2008"),
                    ],
                )
                .with_detail(detail("b1", "Batman Begins", "2005", "8.5"))
                .with_detail(detail("b2", "Batman Forever", "1995", "7.0"))
                .with_detail(detail("b3", "The Dark Knight", "2008", "9.0")),
        );
        let agg = Aggregator::new(source.clone()).with_enrich_cap(2);

        let primary = agg.fetch_primary("batman").await;
        assert_eq!(primary.len(), 3);

        let outcome = agg
            .enrich_and_filter(&primary.items, &Filter::new().with_min_rating(8.0))
            .await;

        assert_eq!(ids(&outcome.items, |r| r.id.as_str()), vec!["b1"]);
        assert_eq!(source.detail_calls(), vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_enrich_excludes_failed_lookups_and_keeps_order() {
        let source = FakeSource::new()
            .with_detail(detail("a", "A", "2001", "6.0").with_genre("Drama"))
            .with_detail_error("b", FetchError::Parse("bad".into()))
            .with_detail(detail("c", "C", "2001", "7.0").with_genre("Comedy, Drama"));
        let agg = Aggregator::new(Arc::new(source));
        let input = vec![movie("a", "A", "2001"), movie("b", "B", "2001"), movie("c", "C", "2001")];

        let outcome = agg
            .enrich_and_filter(&input, &Filter::new().with_genre("drama"))
            .await;

        assert_eq!(ids(&outcome.items, |r| r.id.as_str()), vec!["a", "c"]);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_enrich_keeps_search_poster() {
        let mut record = detail("a", "A", "2001", "9.0");
        record.poster_url = Some("N/A".to_string());
        let agg = Aggregator::new(Arc::new(FakeSource::new().with_detail(record)));

        let outcome = agg
            .enrich_and_filter(&[movie("a", "A", "2001")], &Filter::new().with_min_rating(5.0))
            .await;
        assert!(outcome.items[0].has_poster());
    }

    #[tokio::test]
    async fn test_year_panel_scenario() {
        let source = Arc::new(
            FakeSource::new()
                .with_search(
                    "war",
                    Some("1999"),
                    vec![
                        movie("w1", "War One", "1999"),
                        movie("w2", "War Two", "1999"),
                        movie("w3", "War Three", "1999"),
                        movie("w4", "War Four", "1999"),
                    ],
                )
                .with_search(
                    "king",
                    Some("1999"),
                    vec![movie("w2", "War Two", "1999"), movie("k1", "King", "1999")],
                ),
        );
        let agg = Aggregator::new(source.clone());

        let outcome = agg
            .build_year_panel("1999", &terms(&["war", "king", "love"]), 5)
            .await;

        assert_eq!(
            ids(&outcome.items, |m| m.id.as_str()),
            vec!["w1", "w2", "w3", "w4", "k1"]
        );
        assert_eq!(source.calls(), vec!["s:war:1999", "s:king:1999"]);
    }

    #[tokio::test]
    async fn test_year_panel_truncates_and_dedups() {
        let source = FakeSource::new().with_search(
            "love",
            Some("1980"),
            vec![
                movie("a", "A", "1980"),
                movie("a", "A", "1980"),
                SearchResult::new("np", "No Poster", "1980"),
                movie("b", "B", "1980"),
                movie("c", "C", "1980"),
            ],
        );
        let agg = Aggregator::new(Arc::new(source));

        let outcome = agg.build_year_panel("1980", &terms(&["love"]), 2).await;
        assert_eq!(ids(&outcome.items, |m| m.id.as_str()), vec!["a", "b"]);

        let unique: HashSet<_> = outcome.items.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(unique.len(), outcome.len());
    }

    #[tokio::test]
    async fn test_year_panel_continues_past_failures() {
        let source = FakeSource::new()
            .with_search_error("war", Some("2010"), FetchError::Transport("reset".into()))
            .with_search("king", Some("2010"), vec![movie("k", "King", "2010")]);
        let agg = Aggregator::new(Arc::new(source));

        let outcome = agg
            .build_year_panel("2010", &terms(&["war", "king", "man"]), 10)
            .await;

        assert_eq!(ids(&outcome.items, |m| m.id.as_str()), vec!["k"]);
        // "war" failed with transport, "man" came back not found
        assert_eq!(outcome.failures.len(), 2);
    }

    #[tokio::test]
    async fn test_year_panel_zero_cap() {
        let source = Arc::new(FakeSource::new());
        let agg = Aggregator::new(source.clone());
        let outcome = agg.build_year_panel("2000", &terms(&["war"]), 0).await;
        assert!(outcome.is_empty());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rank_sorts_descending_and_stable() {
        let source = FakeSource::new()
            .with_detail(detail("a", "A", "2000", "7.0"))
            .with_detail(detail("b", "B", "2000", "8.0"))
            .with_detail(detail("c", "C", "2000", "7.0"))
            .with_detail(detail("d", "D", "2000", "9.1"));
        let agg = Aggregator::new(Arc::new(source)).with_concurrency(2);
        let pool: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| movie(id, id, "2000"))
            .collect();

        let outcome = agg.rank_by_rating(&pool, 10).await;
        assert_eq!(ids(&outcome.items, |r| r.id.as_str()), vec!["d", "b", "a", "c"]);

        let ratings: Vec<f64> = outcome.items.iter().map(|r| r.numeric_rating).collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_rank_recombines_by_index_when_early_lookups_answer_last() {
        let source = FakeSource::new()
            .with_detail(detail("a", "A", "2000", "7.0"))
            .with_detail(detail("b", "B", "2000", "8.0"))
            .with_detail(detail("c", "C", "2000", "7.0"))
            .with_detail(detail("d", "D", "2000", "9.1"))
            .with_detail_delay("a", Duration::from_millis(60))
            .with_detail_delay("b", Duration::from_millis(30));
        let agg = Aggregator::new(Arc::new(source)).with_concurrency(4);
        let pool: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| movie(id, id, "2000"))
            .collect();

        let outcome = agg.rank_by_rating(&pool, 10).await;
        // a and c tie; a still comes first because it came first in the pool
        assert_eq!(ids(&outcome.items, |r| r.id.as_str()), vec!["d", "b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_enrich_keeps_input_order_when_early_lookups_answer_last() {
        let source = FakeSource::new()
            .with_detail(detail("a", "A", "2000", "7.0"))
            .with_detail(detail("b", "B", "2000", "8.0"))
            .with_detail(detail("c", "C", "2000", "6.0"))
            .with_detail_delay("a", Duration::from_millis(60))
            .with_detail_delay("b", Duration::from_millis(30));
        let agg = Aggregator::new(Arc::new(source)).with_concurrency(3);
        let results = vec![movie("a", "A", "2000"), movie("b", "B", "2000"), movie("c", "C", "2000")];

        let outcome = agg
            .enrich_and_filter(&results, &Filter::new().with_min_rating(5.0))
            .await;
        assert_eq!(ids(&outcome.items, |r| r.id.as_str()), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_rank_failure_gets_zero_rating() {
        let source = Arc::new(
            FakeSource::new()
                .with_detail(detail("a", "A", "2000", "6.5"))
                .with_detail_error("b", FetchError::Transport("timeout".into()))
                .with_detail(detail("c", "C", "2000", "N/A")),
        );
        let agg = Aggregator::new(source.clone());
        let pool = vec![movie("a", "A", "2000"), movie("b", "B", "2000"), movie("c", "C", "2000")];

        let outcome = agg.rank_by_rating(&pool, 3).await;
        assert_eq!(ids(&outcome.items, |r| r.id.as_str()), vec!["a", "b", "c"]);
        assert_eq!(outcome.items[1].numeric_rating, 0.0);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_rank_respects_cap() {
        let source = Arc::new(
            FakeSource::new()
                .with_detail(detail("a", "A", "2000", "5.0"))
                .with_detail(detail("b", "B", "2000", "6.0")),
        );
        let agg = Aggregator::new(source.clone());
        let pool = vec![movie("a", "A", "2000"), movie("b", "B", "2000"), movie("c", "C", "2000")];

        let outcome = agg.rank_by_rating(&pool, 2).await;
        assert_eq!(outcome.len(), 2);
        assert_eq!(source.detail_calls(), vec!["a", "b"]);
    }
}
