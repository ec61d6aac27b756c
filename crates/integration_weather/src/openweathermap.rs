//! OpenWeatherMap client
//!
//! Single request to the current weather endpoint. Requires an API key; a
//! missing key fails fast without touching the network.

use std::time::Duration;

use async_trait::async_trait;
use domain::NormalizedWeather;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use crate::client::{WeatherError, WeatherProvider, build_http_client, get_json};
use crate::models::OwmResponse;
use crate::retry::RetryConfig;

/// Source tag of OpenWeatherMap readings
pub const SOURCE: &str = "openweathermap";

/// OpenWeatherMap client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMapConfig {
    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; requests fail with a configuration error when absent
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retry policy applied to each request
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for OpenWeatherMapConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl OpenWeatherMapConfig {
    /// Default configuration with the given API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::default()
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.trim().is_empty())
    }
}

/// OpenWeatherMap HTTP client
#[derive(Debug, Clone)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: OpenWeatherMapConfig,
}

impl OpenWeatherMapClient {
    /// Create a client that owns a freshly built HTTP client
    ///
    /// A missing API key is not an error here; it is reported on every fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenWeatherMapConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout())?;
        Ok(Self { client, config })
    }

    /// Create a client on top of an existing HTTP client
    #[must_use]
    pub const fn with_http_client(config: OpenWeatherMapConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.usable_key().is_some()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    fn name(&self) -> &'static str {
        SOURCE
    }

    #[instrument(skip(self), fields(provider = SOURCE))]
    async fn fetch_current(&self, city: &str) -> Result<NormalizedWeather, WeatherError> {
        let key = self.config.usable_key().ok_or_else(|| {
            WeatherError::Config("openweathermap: WEATHER_API_KEY not set".to_string())
        })?;

        let url = format!("{}/weather", self.config.base_url);
        let response: OwmResponse = get_json(
            &self.client,
            &url,
            &[("q", city), ("appid", key), ("units", "metric")],
            self.config.timeout(),
            &self.config.retry,
        )
        .await?;

        let reported_city = if response.name.trim().is_empty() {
            city.to_string()
        } else {
            response.name
        };

        Ok(NormalizedWeather::new(
            reported_city,
            response.main.temp,
            Some(response.main.humidity),
            SOURCE,
            response.dt,
        ))
    }
}
