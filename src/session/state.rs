//! Immutable snapshots of the interaction state

use crate::results::{DetailRecord, FetchFailure, Filter, SearchResult};
use serde::Serialize;
use std::sync::Arc;

/// Everything the user currently sees. Each action builds a new snapshot
/// rather than mutating the previous one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    /// Generation of the search that produced `results`
    pub generation: u64,
    /// Term of the last applied search
    pub query: String,
    /// Poster-bearing primary results (the grid)
    pub results: Vec<SearchResult>,
    /// Filter last applied to `results`
    pub filter: Filter,
    /// Enriched and filtered results, present while a filter is active
    pub filtered: Option<Vec<DetailRecord>>,
    /// Detail view of the selected item
    pub selected: Option<DetailRecord>,
    pub year_panel: Option<YearPanel>,
    /// Failures met by the last action
    pub diagnostics: Vec<FetchFailure>,
}

impl ViewState {
    /// Entries to render in the grid: the filtered set when a filter is
    /// active, otherwise the primary results
    pub fn grid_len(&self) -> usize {
        self.filtered
            .as_ref()
            .map(Vec::len)
            .unwrap_or(self.results.len())
    }
}

/// "Movies from year X" panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPanel {
    pub year: String,
    pub entries: PanelEntries,
    /// Shown instead of the panel when it is empty
    pub message: Option<String>,
}

impl YearPanel {
    pub fn new(year: impl Into<String>, entries: PanelEntries) -> Self {
        let year = year.into();
        let message = entries
            .is_empty()
            .then(|| format!("No movies found for {}", year));
        Self {
            year,
            entries,
            message,
        }
    }
}

/// Panel contents, either as sampled or ranked by rating
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "movies", rename_all = "snake_case")]
pub enum PanelEntries {
    Sampled(Vec<SearchResult>),
    Ranked(Vec<DetailRecord>),
}

impl PanelEntries {
    pub fn len(&self) -> usize {
        match self {
            Self::Sampled(movies) => movies.len(),
            Self::Ranked(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Sampled(movies) => movies.iter().map(|m| m.id.as_str()).collect(),
            Self::Ranked(records) => records.iter().map(|r| r.id.as_str()).collect(),
        }
    }
}

/// Result of an action on the controller
#[derive(Debug, Clone)]
pub enum Update {
    /// The action's result is now the current state
    Applied(Arc<ViewState>),
    /// A newer action started before this one finished; its result was dropped
    Superseded,
}

impl Update {
    pub fn state(&self) -> Option<&Arc<ViewState>> {
        match self {
            Self::Applied(state) => Some(state),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}
