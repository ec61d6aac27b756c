//! Weather read handlers: latest aggregate and history-backed forecast

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use domain::{CityEntry, NormalizedWeather};
use serde::{Deserialize, Serialize};

use super::require_city;
use crate::{error::ApiError, state::AppState};

/// Largest `days` value the forecast endpoint accepts
pub const MAX_FORECAST_DAYS: usize = 7;

/// `?city=` query
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

/// `?city=&days=` query; `days` is parsed by hand to control the error
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub city: Option<String>,
    pub days: Option<String>,
}

/// One forecast point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub temp_c: f64,
}

/// Forecast response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub city: String,
    pub requested_days: usize,
    /// Newest first
    pub data: Vec<ForecastPoint>,
}

fn aggregated_entry(state: &AppState, city: &str) -> Result<CityEntry, ApiError> {
    state
        .store
        .get(city)
        .filter(|entry| entry.aggregated().is_some())
        .ok_or_else(|| ApiError::NotFound("no data for city".to_string()))
}

fn parse_days(days: Option<&str>) -> Result<usize, ApiError> {
    let Some(raw) = days else {
        return Ok(1);
    };
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|d| (1..=MAX_FORECAST_DAYS).contains(d))
        .ok_or_else(|| ApiError::BadRequest("days must be 1-7".to_string()))
}

/// Latest aggregated reading for a city
pub async fn current(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<NormalizedWeather>, ApiError> {
    let city = require_city(query.city.as_deref())?;
    let entry = aggregated_entry(&state, city.as_str())?;
    entry
        .aggregated()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no data for city".to_string()))
}

/// Up to `days` most recent history entries, newest first
///
/// There is no forecast model behind this; stored history stands in for it.
pub async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let city = require_city(query.city.as_deref())?;
    let days = parse_days(query.days.as_deref())?;
    let entry = aggregated_entry(&state, city.as_str())?;

    let data = entry
        .history()
        .iter()
        .rev()
        .take(days)
        .map(|reading| ForecastPoint {
            time: reading.time(),
            temp_c: reading.temperature(),
        })
        .collect();

    Ok(Json(ForecastResponse {
        city: city.to_string(),
        requested_days: days,
        data,
    }))
}
