//! Open-Meteo client
//!
//! Resolves the city through the geocoding API, then reads the current
//! weather for the first match. Open-Meteo does not report humidity in
//! `current_weather`, so readings from this source never carry one.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use domain::NormalizedWeather;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{WeatherError, WeatherProvider, build_http_client, get_json};
use crate::models::{ForecastResponse, GeocodingResponse};
use crate::retry::RetryConfig;

/// Source tag of Open-Meteo readings
pub const SOURCE: &str = "open-meteo";

/// Open-Meteo client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Geocoding API base URL (default: <https://geocoding-api.open-meteo.com/v1>)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Forecast API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retry policy applied to each request
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl OpenMeteoConfig {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Open-Meteo HTTP client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Create a client that owns a freshly built HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout())?;
        Ok(Self { client, config })
    }

    /// Create a client on top of an existing HTTP client
    #[must_use]
    pub const fn with_http_client(config: OpenMeteoConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(OpenMeteoConfig::default())
    }

    /// Resolve a city name to coordinates; the first match wins
    #[instrument(skip(self))]
    async fn geocode(&self, city: &str) -> Result<(f64, f64), WeatherError> {
        let url = format!("{}/search", self.config.geocoding_url);
        let response: GeocodingResponse = get_json(
            &self.client,
            &url,
            &[("name", city), ("count", "1")],
            self.config.timeout(),
            &self.config.retry,
        )
        .await?;

        let first = response.results.into_iter().next().ok_or_else(|| {
            WeatherError::NotFound(format!("open-meteo: no geocoding result for {city}"))
        })?;

        debug!(
            matched = first.name.as_deref().unwrap_or(city),
            country = first.country.as_deref().unwrap_or("-"),
            lat = first.latitude,
            lon = first.longitude,
            "Geocoded city"
        );

        Ok((first.latitude, first.longitude))
    }

    /// Read current conditions at the given coordinates
    async fn current_at(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse, WeatherError> {
        let url = format!("{}/forecast", self.config.forecast_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("timezone", "UTC".to_string()),
        ];
        get_json(
            &self.client,
            &url,
            &query,
            self.config.timeout(),
            &self.config.retry,
        )
        .await
    }

    /// Parse the observation time reported by the forecast API
    ///
    /// Accepts RFC 3339 as well as the zone-less ISO 8601 form Open-Meteo
    /// returns for `timezone=UTC` (2024-01-15T12:00).
    fn parse_time(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    fn name(&self) -> &'static str {
        SOURCE
    }

    #[instrument(skip(self), fields(provider = SOURCE))]
    async fn fetch_current(&self, city: &str) -> Result<NormalizedWeather, WeatherError> {
        let (latitude, longitude) = self.geocode(city).await?;
        let response = self.current_at(latitude, longitude).await?;
        let current = response.current_weather;

        let time = current
            .time
            .as_deref()
            .filter(|t| !t.is_empty())
            .and_then(Self::parse_time)
            .unwrap_or_else(Utc::now);

        Ok(NormalizedWeather::new(
            city,
            current.temperature,
            None,
            SOURCE,
            time,
        ))
    }
}
