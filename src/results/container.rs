//! Containers for call results and their diagnostics

use super::types::SearchResult;
use crate::error::FetchError;
use serde::Serialize;
use std::collections::HashSet;

/// A failed call, kept so the caller can show why data is missing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    /// Human-readable description of the call (e.g. `search "batman"`)
    pub call: String,
    pub error: FetchError,
}

impl FetchFailure {
    pub fn new(call: impl Into<String>, error: FetchError) -> Self {
        Self {
            call: call.into(),
            error,
        }
    }
}

/// Items produced by an aggregation step plus the failures met on the way
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub items: Vec<T>,
    pub failures: Vec<FetchFailure>,
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Outcome<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            failures: Vec::new(),
        }
    }

    /// An empty outcome caused by a single failure
    pub fn failed(failure: FetchFailure) -> Self {
        Self {
            items: Vec::new(),
            failures: vec![failure],
        }
    }

    pub fn record_failure(&mut self, failure: FetchFailure) {
        self.failures.push(failure);
    }

    pub fn absorb_failures<U>(&mut self, other: Outcome<U>) -> Vec<U> {
        self.failures.extend(other.failures);
        other.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Accumulates search entries, dropping repeated ids and entries without a
/// poster while keeping first-seen order
#[derive(Debug, Clone, Default)]
pub struct UniquePool {
    seen: HashSet<String>,
    entries: Vec<SearchResult>,
}

impl UniquePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; returns false when it was rejected
    pub fn push(&mut self, entry: SearchResult) -> bool {
        if !entry.has_poster() || !self.seen.insert(entry.id.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Add entries until the pool holds `cap` of them
    pub fn extend_until(&mut self, entries: impl IntoIterator<Item = SearchResult>, cap: usize) {
        for entry in entries {
            if self.len() >= cap {
                break;
            }
            self.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<SearchResult> {
        self.entries
    }
}

/// Drop repeated ids, keeping the first occurrence of each
pub fn dedup_by_id(entries: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .collect()
}
