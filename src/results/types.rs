//! Movie result type definitions

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Value the API uses in place of a missing field
pub const NOT_AVAILABLE: &str = "N/A";

static RUNTIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*min").unwrap());

/// A single entry from a title search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// External unique identifier (IMDb id)
    pub id: String,
    pub title: String,
    /// Release year, or a range for series (e.g. `2010–2014`)
    pub year: String,
    /// Poster image URL, possibly empty or `N/A`
    pub poster_url: Option<String>,
    /// `movie`, `series` or `episode`
    #[serde(default)]
    pub kind: String,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: year.into(),
            poster_url: None,
            kind: "movie".to_string(),
        }
    }

    pub fn with_poster(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }

    /// Whether this entry has a displayable poster
    pub fn has_poster(&self) -> bool {
        is_present(self.poster_url.as_deref())
    }
}

/// Full record for a single title, as shown in the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
    #[serde(default)]
    pub kind: String,
    /// Rating text as returned by the API (e.g. `8.5`)
    pub rating: String,
    /// Certification (e.g. `PG-13`)
    pub rated: String,
    /// Runtime in minutes, when the API reports one
    pub runtime_minutes: Option<u32>,
    pub genre: String,
    pub plot: String,
    pub cast: String,
    pub director: String,
    /// `rating` parsed as a number, 0 when missing or unparseable
    pub numeric_rating: f64,
}

impl DetailRecord {
    /// Lift a search entry into a record with no detail fields filled in
    pub fn from_summary(summary: SearchResult) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            year: summary.year,
            poster_url: summary.poster_url,
            kind: summary.kind,
            rating: String::new(),
            rated: String::new(),
            runtime_minutes: None,
            genre: String::new(),
            plot: String::new(),
            cast: String::new(),
            director: String::new(),
            numeric_rating: 0.0,
        }
    }

    /// Set the rating text and recompute the numeric rating from it
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self.numeric_rating = parse_rating(&self.rating);
        self
    }

    pub fn with_runtime(mut self, minutes: u32) -> Self {
        self.runtime_minutes = Some(minutes);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn has_poster(&self) -> bool {
        is_present(self.poster_url.as_deref())
    }

    /// The search-level view of this record
    pub fn summary(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster_url: self.poster_url.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// Parse a rating such as `7.9`; anything else is 0
pub fn parse_rating(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

/// Parse a runtime such as `142 min`
pub fn parse_runtime(text: &str) -> Option<u32> {
    RUNTIME_RE
        .captures(text)
        .and_then(|cap| cap[1].parse().ok())
}

/// True when a field holds a real value rather than nothing, blank or `N/A`
pub fn is_present(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            !v.is_empty() && !v.eq_ignore_ascii_case(NOT_AVAILABLE)
        }
        None => false,
    }
}
