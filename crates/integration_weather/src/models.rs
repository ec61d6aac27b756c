//! Wire formats of the upstream APIs

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Open-Meteo geocoding response
///
/// `results` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResult {
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

/// Open-Meteo forecast response with `current_weather=true`
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub current_weather: CurrentWeatherData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherData {
    pub temperature: f64,
    #[serde(default)]
    pub time: Option<String>,
}

/// OpenWeatherMap `/weather` response
#[derive(Debug, Deserialize)]
pub(crate) struct OwmResponse {
    pub main: OwmMain,
    /// Observation time, sent as Unix seconds
    #[serde(with = "chrono::serde::ts_seconds")]
    pub dt: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmMain {
    pub temp: f64,
    pub humidity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_without_results_field() {
        let parsed: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn geocoding_with_results() {
        let json = r#"{"results":[{"name":"Paris","latitude":48.85,"longitude":2.35,"country":"France"}]}"#;
        let parsed: GeocodingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].country.as_deref(), Some("France"));
    }

    #[test]
    fn forecast_requires_current_weather() {
        assert!(serde_json::from_str::<ForecastResponse>(r#"{"latitude":1.0}"#).is_err());
    }

    #[test]
    fn owm_response_parses() {
        let json = r#"{"main":{"temp":21.3,"humidity":40},"dt":1700000000,"name":"Madrid"}"#;
        let parsed: OwmResponse = serde_json::from_str(json).unwrap();
        assert!((parsed.main.humidity - 40.0).abs() < f64::EPSILON);
        assert_eq!(parsed.dt.timestamp(), 1_700_000_000);
        assert_eq!(parsed.name, "Madrid");
    }

    #[test]
    fn owm_timestamp_out_of_range_fails_to_decode() {
        let json = r#"{"main":{"temp":21.3,"humidity":40},"dt":9223372036854775807,"name":"Madrid"}"#;
        assert!(serde_json::from_str::<OwmResponse>(json).is_err());
    }
}
