//! Detail filters applied after enrichment

use super::types::DetailRecord;
use serde::{Deserialize, Serialize};

/// Runtime ranges a user can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeBucket {
    /// Up to and including 90 minutes
    Short,
    /// Over 90 and up to 150 minutes
    Medium,
    /// Over 150 minutes
    Long,
}

impl RuntimeBucket {
    pub fn contains(self, minutes: u32) -> bool {
        match self {
            Self::Short => minutes <= 90,
            Self::Medium => minutes > 90 && minutes <= 150,
            Self::Long => minutes > 150,
        }
    }
}

/// User-selected constraints on the detail view of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Case-insensitive substring of the genre list
    pub genre: Option<String>,
    /// Exact release year
    pub year: Option<String>,
    /// Minimum numeric rating, inclusive
    pub min_rating: Option<f64>,
    pub runtime_bucket: Option<RuntimeBucket>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_runtime(mut self, bucket: RuntimeBucket) -> Self {
        self.runtime_bucket = Some(bucket);
        self
    }

    /// Whether any predicate is set. Blank strings do not count.
    pub fn is_active(&self) -> bool {
        self.genre().is_some()
            || self.year().is_some()
            || self.min_rating.is_some()
            || self.runtime_bucket.is_some()
    }

    /// Check a record against every active predicate
    pub fn matches(&self, record: &DetailRecord) -> bool {
        if let Some(genre) = self.genre() {
            let genre = genre.to_lowercase();
            if !record.genre.to_lowercase().contains(&genre) {
                return false;
            }
        }

        if let Some(year) = self.year() {
            if record.year.trim() != year {
                return false;
            }
        }

        if let Some(min) = self.min_rating {
            if record.numeric_rating < min {
                return false;
            }
        }

        if let Some(bucket) = self.runtime_bucket {
            match record.runtime_minutes {
                Some(minutes) if bucket.contains(minutes) => {}
                _ => return false,
            }
        }

        true
    }

    fn genre(&self) -> Option<&str> {
        self.genre.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }

    fn year(&self) -> Option<&str> {
        self.year.as_deref().map(str::trim).filter(|y| !y.is_empty())
    }
}
