//! Interaction controller
//!
//! Drives the aggregator in response to user actions and owns the current
//! [`ViewState`]. Each kind of action bumps its own generation counter; a
//! result that comes back after a newer action of the same kind (or a newer
//! search) started is discarded instead of overwriting the newer state.

use super::state::{PanelEntries, Update, ViewState, YearPanel};
use crate::aggregate::{select_random_seed, Aggregator};
use crate::config::AggregatorSettings;
use crate::results::{Filter, Outcome};
use chrono::Datelike;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

pub struct Controller {
    aggregator: Aggregator,
    settings: AggregatorSettings,
    state: RwLock<Arc<ViewState>>,
    /// Bumped by every search
    generation: AtomicU64,
    /// Bumped by every select and clear
    selection_generation: AtomicU64,
    /// Bumped by every filter change
    filter_generation: AtomicU64,
    /// Bumped by every year panel load
    panel_generation: AtomicU64,
}

impl Controller {
    pub fn new(aggregator: Aggregator, settings: AggregatorSettings) -> Self {
        Self {
            aggregator,
            settings,
            state: RwLock::new(Arc::new(ViewState::default())),
            generation: AtomicU64::new(0),
            selection_generation: AtomicU64::new(0),
            filter_generation: AtomicU64::new(0),
            panel_generation: AtomicU64::new(0),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> Arc<ViewState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pick the term for the first search, before any user input
    pub fn initial_term<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        select_random_seed(&self.settings.initial_keywords, rng)
    }

    /// Run the first search with a randomly picked initial keyword
    pub async fn bootstrap<R: Rng + ?Sized>(&self, rng: &mut R) -> (String, Update) {
        let term = self.initial_term(rng);
        let update = self.search(&term).await;
        (term, update)
    }

    /// Run a new search. Clears the selection and any filter.
    pub async fn search(&self, term: &str) -> Update {
        let token = bump(&self.generation);
        info!("Search #{} for '{}'", token, term.trim());

        let outcome = self.aggregator.fetch_primary(term).await;

        self.commit(&[(&self.generation, token)], |prev| ViewState {
            generation: token,
            query: term.trim().to_string(),
            results: outcome.items,
            filter: Filter::default(),
            filtered: None,
            selected: None,
            year_panel: prev.year_panel.clone(),
            diagnostics: outcome.failures,
        })
    }

    /// Open the detail view for one result
    pub async fn select(&self, id: &str) -> Update {
        let search = self.generation.load(Ordering::SeqCst);
        let token = bump(&self.selection_generation);
        let lookup = self.aggregator.fetch_detail(id).await;

        let guards = [(&self.generation, search), (&self.selection_generation, token)];
        self.commit(&guards, |prev| {
            let (selected, diagnostics) = match lookup {
                Ok(record) => (Some(record), Vec::new()),
                Err(failure) => (None, vec![failure]),
            };
            ViewState {
                selected,
                diagnostics,
                ..prev.clone()
            }
        })
    }

    /// Close the detail view
    pub fn clear_selection(&self) -> Update {
        let token = bump(&self.selection_generation);
        self.commit(&[(&self.selection_generation, token)], |prev| ViewState {
            selected: None,
            diagnostics: Vec::new(),
            ..prev.clone()
        })
    }

    /// Filter the current results; an inactive filter restores the plain grid
    pub async fn apply_filter(&self, filter: Filter) -> Update {
        let search = self.generation.load(Ordering::SeqCst);
        let token = bump(&self.filter_generation);
        let current = self.snapshot();

        let outcome = self
            .aggregator
            .enrich_and_filter(&current.results, &filter)
            .await;
        let active = filter.is_active();

        let guards = [(&self.generation, search), (&self.filter_generation, token)];
        self.commit(&guards, |prev| ViewState {
            filter,
            filtered: active.then_some(outcome.items),
            diagnostics: outcome.failures,
            ..prev.clone()
        })
    }

    /// Fill the year panel, optionally ranked by rating. `None` uses the
    /// configured default year or the current year.
    pub async fn load_year_panel(&self, year: Option<&str>, ranked: bool) -> Update {
        let token = bump(&self.panel_generation);
        let year = year
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .map(String::from)
            .unwrap_or_else(|| self.default_year());

        let sample = self
            .aggregator
            .build_year_panel(
                &year,
                &self.settings.seed_terms,
                self.settings.year_panel_cap,
            )
            .await;

        let mut failures = Outcome::<()>::default();
        let movies = failures.absorb_failures(sample);

        let entries = if ranked {
            let ranking = self
                .aggregator
                .rank_by_rating(&movies, self.settings.rank_cap)
                .await;
            PanelEntries::Ranked(failures.absorb_failures(ranking))
        } else {
            PanelEntries::Sampled(movies)
        };
        debug!("Year panel {} holds {} movies", year, entries.len());

        self.commit(&[(&self.panel_generation, token)], |prev| ViewState {
            year_panel: Some(YearPanel::new(year, entries)),
            diagnostics: failures.failures,
            ..prev.clone()
        })
    }

    fn default_year(&self) -> String {
        self.settings
            .default_year
            .clone()
            .unwrap_or_else(|| chrono::Local::now().year().to_string())
    }

    /// Replace the state with `build(previous)` unless any counter moved
    /// past the token captured for it
    fn commit<F>(&self, guards: &[(&AtomicU64, u64)], build: F) -> Update
    where
        F: FnOnce(&ViewState) -> ViewState,
    {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, token)) = guards
            .iter()
            .find(|(counter, token)| counter.load(Ordering::SeqCst) != *token)
        {
            debug!("Discarding result of superseded action #{}", token);
            return Update::Superseded;
        }
        let next = Arc::new(build(&guard));
        *guard = next.clone();
        Update::Applied(next)
    }
}

fn bump(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}
