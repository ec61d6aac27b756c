//! Health and status handlers

use std::collections::BTreeMap;

use axum::{Json, extract::State, response::Html};
use chrono::{DateTime, Utc};
use infrastructure::{StatusRow, TemplateEngine};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Last successful save per city
    pub last_fetches: BTreeMap<String, DateTime<Utc>>,
}

/// Liveness check with the last successful fetch per city
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        last_fetches: state.store.all_last_fetches().into_iter().collect(),
    })
}

/// Minimal HTML page listing each city's last successful fetch
pub async fn status_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let fetches: BTreeMap<_, _> = state.store.all_last_fetches().into_iter().collect();
    render_status(&state.templates, &fetches).map(Html)
}

fn render_status(
    templates: &TemplateEngine,
    fetches: &BTreeMap<String, DateTime<Utc>>,
) -> Result<String, ApiError> {
    let rows: Vec<StatusRow> = fetches
        .iter()
        .map(|(city, fetched_at)| StatusRow::new(city.as_str(), *fetched_at))
        .collect();
    templates
        .render_status(&rows)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
