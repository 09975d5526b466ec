//! Wire format of the movie database responses

use crate::error::FetchError;
use crate::results::{parse_rating, parse_runtime, DetailRecord, SearchResult};
use serde::Deserialize;

/// `Response` is the string `"True"` or `"False"`
fn is_true(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

/// Envelope of a title search (`?s=`)
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    #[serde(rename = "Search")]
    pub search: Option<Vec<SearchItem>>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl SearchEnvelope {
    pub fn into_results(self) -> Result<Vec<SearchResult>, FetchError> {
        if !is_true(&self.response) {
            return Err(FetchError::NotFound(
                self.error.unwrap_or_else(|| "no results".to_string()),
            ));
        }
        Ok(self
            .search
            .unwrap_or_default()
            .into_iter()
            .map(SearchItem::into_result)
            .collect())
    }
}

/// One entry of the `Search` array
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

impl SearchItem {
    fn into_result(self) -> SearchResult {
        SearchResult {
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: self.poster,
            kind: self.kind,
        }
    }
}

/// Flattened detail record (`?i=`)
#[derive(Debug, Deserialize)]
pub struct DetailEnvelope {
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Rated", default)]
    pub rated: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
}

impl DetailEnvelope {
    pub fn into_record(self) -> Result<DetailRecord, FetchError> {
        if !is_true(&self.response) {
            return Err(FetchError::NotFound(
                self.error.unwrap_or_else(|| "unknown id".to_string()),
            ));
        }
        Ok(DetailRecord {
            numeric_rating: parse_rating(&self.imdb_rating),
            runtime_minutes: parse_runtime(&self.runtime),
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: self.poster,
            kind: self.kind,
            rating: self.imdb_rating,
            rated: self.rated,
            genre: self.genre,
            plot: self.plot,
            cast: self.actors,
            director: self.director,
        })
    }
}
