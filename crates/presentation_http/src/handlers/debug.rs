//! Debug endpoint: refresh one city now and show what every provider said

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Map, Value, json};
use tracing::info;

use super::{require_city, weather::CityQuery};
use crate::{error::ApiError, state::AppState};

/// Response key for a provider tag, as existing clients of this endpoint
/// expect it (`open_meteo`, `open_weather`)
fn response_key(source: &str) -> String {
    match source {
        "open-meteo" => "open_meteo".to_string(),
        "openweathermap" => "open_weather".to_string(),
        other => other.replace('-', "_"),
    }
}

/// Fetch from every provider immediately, aggregate and save.
///
/// The body has one key per provider: `<key>` with its reading or
/// `<key>_error` with its error message, plus `aggregated` when at least
/// one provider succeeded.
pub async fn fetch_now(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Value>, ApiError> {
    let city = require_city(query.city.as_deref())?;
    info!(city = %city, "Manual refresh requested");

    let report = state.refresh.refresh_city_detailed(city.as_str()).await?;
    info!(
        city = %city,
        succeeded = report.readings().count(),
        failed = report.failures().len(),
        "Manual refresh finished"
    );

    let mut body = Map::new();
    for outcome in &report.outcomes {
        let key = response_key(outcome.source);
        match &outcome.result {
            Ok(reading) => {
                body.insert(key, json!(reading));
            },
            Err(e) => {
                body.insert(format!("{key}_error"), json!(e.to_string()));
            },
        }
    }
    if let Some(aggregated) = &report.aggregated {
        body.insert("aggregated".to_string(), json!(aggregated));
    }

    Ok(Json(Value::Object(body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_tags_map_to_response_keys() {
        assert_eq!(response_key("open-meteo"), "open_meteo");
        assert_eq!(response_key("openweathermap"), "open_weather");
        assert_eq!(response_key("met-no"), "met_no");
    }
}
