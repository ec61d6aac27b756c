//! Weather refresh configuration: providers, cities, interval, retry policy.

use std::time::Duration;

use domain::CityName;
use integration_weather::{OpenMeteoConfig, OpenWeatherMapConfig, RetryConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::duration::parse_go_duration;
use crate::cache::HistoryRetention;

/// Interval used when none is configured or the configured one is unusable
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Weather refresh configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// OpenWeatherMap API key (legacy override: `WEATHER_API_KEY`)
    ///
    /// Without a key the OpenWeatherMap source fails every fetch with a
    /// configuration error and only Open-Meteo contributes.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Refresh interval as a Go-style duration (legacy override: `FETCH_INTERVAL`)
    #[serde(default = "default_fetch_interval")]
    pub fetch_interval: String,

    /// Cities refreshed every cycle (legacy override: `DEFAULT_CITIES`)
    #[serde(default)]
    pub default_cities: Vec<String>,

    /// Keep at most this many history entries per city (unbounded when unset)
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// Open-Meteo geocoding API base URL
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Open-Meteo forecast API base URL
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo_url: String,

    /// OpenWeatherMap API base URL
    #[serde(default = "default_openweathermap_url")]
    pub openweathermap_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempts per upstream request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubles after each further failure
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl std::fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("fetch_interval", &self.fetch_interval)
            .field("default_cities", &self.default_cities)
            .field("history_limit", &self.history_limit)
            .field("geocoding_url", &self.geocoding_url)
            .field("open_meteo_url", &self.open_meteo_url)
            .field("openweathermap_url", &self.openweathermap_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .finish()
    }
}

fn default_fetch_interval() -> String {
    "15m".to_string()
}

fn default_geocoding_url() -> String {
    OpenMeteoConfig::default().geocoding_url
}

fn default_open_meteo_url() -> String {
    OpenMeteoConfig::default().forecast_url
}

fn default_openweathermap_url() -> String {
    OpenWeatherMapConfig::default().base_url
}

const fn default_timeout() -> u64 {
    10
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            fetch_interval: default_fetch_interval(),
            default_cities: Vec::new(),
            history_limit: None,
            geocoding_url: default_geocoding_url(),
            open_meteo_url: default_open_meteo_url(),
            openweathermap_url: default_openweathermap_url(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl WeatherAppConfig {
    /// Parsed refresh interval
    ///
    /// An unparsable or zero interval is logged and replaced by
    /// [`DEFAULT_FETCH_INTERVAL`].
    pub fn refresh_interval(&self) -> Duration {
        match parse_go_duration(&self.fetch_interval) {
            Ok(interval) if !interval.is_zero() => interval,
            Ok(_) => {
                warn!(
                    value = %self.fetch_interval,
                    "Fetch interval must be positive, using default"
                );
                DEFAULT_FETCH_INTERVAL
            },
            Err(e) => {
                warn!(value = %self.fetch_interval, error = %e, "Invalid fetch interval, using default");
                DEFAULT_FETCH_INTERVAL
            },
        }
    }

    /// Configured cities: trimmed, blanks dropped, duplicates removed (first wins)
    pub fn cities(&self) -> Vec<CityName> {
        let mut cities: Vec<CityName> = Vec::with_capacity(self.default_cities.len());
        for raw in &self.default_cities {
            if let Ok(city) = CityName::new(raw.as_str()) {
                if !cities.contains(&city) {
                    cities.push(city);
                }
            }
        }
        cities
    }

    /// Whether a non-blank OpenWeatherMap key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// History policy for the city store
    pub fn history_retention(&self) -> HistoryRetention {
        match self.history_limit {
            Some(limit) if limit > 0 => HistoryRetention::Latest(limit),
            _ => HistoryRetention::Unbounded,
        }
    }

    /// Retry policy shared by both providers
    pub fn retry_policy(&self) -> RetryConfig {
        RetryConfig::new(self.initial_backoff_ms, 2.0, self.max_attempts.max(1))
    }

    /// Open-Meteo client settings
    pub fn open_meteo(&self) -> OpenMeteoConfig {
        OpenMeteoConfig {
            geocoding_url: self.geocoding_url.clone(),
            forecast_url: self.open_meteo_url.clone(),
            timeout_secs: self.timeout_secs,
            retry: self.retry_policy(),
        }
    }

    /// OpenWeatherMap client settings
    pub fn openweathermap(&self) -> OpenWeatherMapConfig {
        OpenWeatherMapConfig {
            base_url: self.openweathermap_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
            retry: self.retry_policy(),
        }
    }
}
