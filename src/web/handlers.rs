//! HTTP request handlers

use super::state::AppState;
use crate::results::Filter;
use crate::session::Update;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search term
    pub q: Option<String>,
}

/// Query parameters for the year panel
#[derive(Debug, Default, Deserialize)]
pub struct PanelParams {
    /// Rank the panel by rating
    #[serde(default)]
    pub ranked: bool,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub term: String,
}

/// Render a controller update as the new state, or 409 when superseded
fn respond(update: Update) -> Response {
    match update {
        Update::Applied(state) => Json(&*state).into_response(),
        Update::Superseded => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "superseded by a newer search" })),
        )
            .into_response(),
    }
}

/// Current state handler
pub async fn state(State(state): State<AppState>) -> Response {
    let snapshot = state.controller.snapshot();
    Json(&*snapshot).into_response()
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let term = params.q.unwrap_or_default();
    respond(state.controller.search(&term).await)
}

/// Detail view handler
pub async fn select(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.controller.select(&id).await)
}

/// Close the detail view
pub async fn clear_selection(State(state): State<AppState>) -> Response {
    respond(state.controller.clear_selection())
}

/// Apply a filter to the current results
pub async fn apply_filter(State(state): State<AppState>, Json(filter): Json<Filter>) -> Response {
    respond(state.controller.apply_filter(filter).await)
}

/// Year panel for an explicit year
pub async fn year_panel(
    State(state): State<AppState>,
    Path(year): Path<String>,
    Query(params): Query<PanelParams>,
) -> Response {
    respond(
        state
            .controller
            .load_year_panel(Some(&year), params.ranked)
            .await,
    )
}

/// Year panel for the default year
pub async fn current_year_panel(
    State(state): State<AppState>,
    Query(params): Query<PanelParams>,
) -> Response {
    respond(state.controller.load_year_panel(None, params.ranked).await)
}

/// Random initial search term
pub async fn seed(State(state): State<AppState>) -> Json<SeedResponse> {
    let term = state.controller.initial_term(&mut rand::thread_rng());
    Json(SeedResponse { term })
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION,
    }))
}
