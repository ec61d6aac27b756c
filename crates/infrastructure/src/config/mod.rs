//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP listener, log format, rate limiting
//! - `weather`: providers, cities, refresh interval, retry policy
//! - `duration`: Go-style duration strings used by the refresh interval
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml`, `WEATHER_`-prefixed environment variables
//! (`WEATHER_SERVER__PORT`, `WEATHER_WEATHER__DEFAULT_CITIES`), and finally
//! the variables the service has always read (`FIBER_PORT`,
//! `WEATHER_API_KEY`, `FETCH_INTERVAL`, `DEFAULT_CITIES`).

mod duration;
mod server;
mod weather;

use secrecy::SecretString;
use serde::Deserialize;
use tracing::warn;

pub use duration::parse_go_duration;
pub use server::ServerConfig;
pub use weather::{DEFAULT_FETCH_INTERVAL, WeatherAppConfig};

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Legacy listen port variable
pub const ENV_PORT: &str = "FIBER_PORT";
/// Legacy OpenWeatherMap key variable
pub const ENV_API_KEY: &str = "WEATHER_API_KEY";
/// Legacy refresh interval variable (Go-style duration)
pub const ENV_FETCH_INTERVAL: &str = "FETCH_INTERVAL";
/// Legacy comma-separated city list variable
pub const ENV_DEFAULT_CITIES: &str = "DEFAULT_CITIES";

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Weather refresh settings
    #[serde(default)]
    pub weather: WeatherAppConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Falls back to the built-in defaults when the file or a `WEATHER_*`
    /// variable is malformed. The legacy variables are applied either way;
    /// the load error, if any, is handed back for logging.
    #[must_use]
    pub fn load_or_default() -> (Self, Option<config::ConfigError>) {
        Self::resolve(Self::load_layered(), env_lookup)
    }

    fn resolve<F>(
        layered: Result<Self, config::ConfigError>,
        lookup: F,
    ) -> (Self, Option<config::ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut app, error) = match layered {
            Ok(app) => (app, None),
            Err(e) => (Self::default(), Some(e)),
        };
        app.apply_legacy_env(lookup);
        (app, error)
    }

    /// Defaults, optional file and `WEATHER_*` variables
    fn load_layered() -> Result<Self, config::ConfigError> {
        let config = Self::builder()?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., WEATHER_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix("WEATHER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("weather.default_cities")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builder preloaded with the built-in defaults
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("weather.fetch_interval", "15m")
    }

    /// Apply the service's historical environment variables on top of the
    /// loaded configuration. `lookup` returns a variable's value, if set.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!(variable = ENV_PORT, value = %port, error = %e, "Ignoring invalid port"),
            }
        }

        if let Some(key) = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty()) {
            self.weather.api_key = Some(SecretString::from(key));
        }

        if let Some(interval) = lookup(ENV_FETCH_INTERVAL) {
            match parse_go_duration(&interval) {
                Ok(parsed) if !parsed.is_zero() => self.weather.fetch_interval = interval,
                _ => warn!(
                    variable = ENV_FETCH_INTERVAL,
                    value = %interval,
                    "Ignoring invalid fetch interval, keeping {}",
                    self.weather.fetch_interval
                ),
            }
        }

        if let Some(cities) = lookup(ENV_DEFAULT_CITIES) {
            self.weather.default_cities = cities
                .split(',')
                .map(str::trim)
                .filter(|city| !city.is_empty())
                .map(String::from)
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn from_toml(toml: &str) -> AppConfig {
        AppConfig::builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn builder_defaults() {
        let config = from_toml("");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.weather.refresh_interval(), Duration::from_secs(900));
        assert!(config.weather.default_cities.is_empty());
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 8080
            log_format = "json"
            rate_limit_rpm = 120

            [weather]
            fetch_interval = "5m"
            default_cities = ["Paris", "Berlin"]
            history_limit = 96
            max_attempts = 4
            "#,
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.server.rate_limit_rpm, 120);
        assert_eq!(config.weather.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.weather.default_cities, vec!["Paris", "Berlin"]);
        assert_eq!(config.weather.history_limit, Some(96));
        assert_eq!(config.weather.max_attempts, 4);
    }

    #[test]
    fn legacy_variables_override_everything() {
        let mut config = from_toml("[server]\nport = 8080\n");
        config.apply_legacy_env(lookup(&[
            ("FIBER_PORT", "4000"),
            ("WEATHER_API_KEY", "owm-key"),
            ("FETCH_INTERVAL", "90s"),
            ("DEFAULT_CITIES", " Paris, Berlin ,,Tokyo "),
        ]));

        assert_eq!(config.server.port, 4000);
        assert!(config.weather.has_api_key());
        assert_eq!(config.weather.refresh_interval(), Duration::from_secs(90));
        assert_eq!(config.weather.default_cities, vec!["Paris", "Berlin", "Tokyo"]);
    }

    #[test]
    fn invalid_legacy_values_keep_previous_settings() {
        let mut config = AppConfig::default();
        config.apply_legacy_env(lookup(&[
            ("FIBER_PORT", "not-a-port"),
            ("WEATHER_API_KEY", "  "),
            ("FETCH_INTERVAL", "every now and then"),
        ]));

        assert_eq!(config.server.port, 3000);
        assert!(config.weather.api_key.is_none());
        assert_eq!(config.weather.fetch_interval, "15m");
    }

    #[test]
    fn failed_load_still_applies_legacy_variables() {
        let (config, error) = AppConfig::resolve(
            Err(config::ConfigError::Message("invalid type for server.port".into())),
            lookup(&[
                ("FIBER_PORT", "4000"),
                ("WEATHER_API_KEY", "owm-key"),
                ("DEFAULT_CITIES", "Paris,Berlin"),
            ]),
        );

        assert!(error.is_some());
        assert_eq!(config.server.port, 4000);
        assert!(config.weather.has_api_key());
        assert_eq!(config.weather.default_cities, vec!["Paris", "Berlin"]);
        assert_eq!(config.weather.fetch_interval, "15m");
    }

    #[test]
    fn successful_load_reports_no_error() {
        let (config, error) = AppConfig::resolve(
            Ok(from_toml("[weather]\ndefault_cities = [\"Oslo\"]\n")),
            lookup(&[("FETCH_INTERVAL", "90s")]),
        );

        assert!(error.is_none());
        assert_eq!(config.weather.default_cities, vec!["Oslo"]);
        assert_eq!(config.weather.refresh_interval(), Duration::from_secs(90));
    }

    #[test]
    fn absent_legacy_variables_change_nothing() {
        let mut config = from_toml("[weather]\ndefault_cities = [\"Oslo\"]\n");
        config.apply_legacy_env(|_| None);
        assert_eq!(config.weather.default_cities, vec!["Oslo"]);
    }
}
