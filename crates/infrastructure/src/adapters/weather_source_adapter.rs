//! Weather source adapter - Implements WeatherSourcePort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::WeatherSourcePort;
use async_trait::async_trait;
use domain::NormalizedWeather;
use integration_weather::{
    OpenMeteoClient, OpenWeatherMapClient, WeatherError, WeatherProvider,
};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::WeatherAppConfig;

/// Adapter exposing a weather provider client as a [`WeatherSourcePort`]
#[derive(Clone)]
pub struct WeatherSourceAdapter {
    provider: Arc<dyn WeatherProvider>,
}

impl std::fmt::Debug for WeatherSourceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSourceAdapter")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl WeatherSourceAdapter {
    /// Wrap an existing provider
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::Transport(_)
            | WeatherError::UpstreamStatus { .. }
            | WeatherError::Decode(_) => ApplicationError::ExternalService(err.to_string()),
            WeatherError::Config(e) => ApplicationError::Configuration(e),
            WeatherError::NotFound(e) => ApplicationError::NotFound(e),
        }
    }
}

#[async_trait]
impl WeatherSourcePort for WeatherSourceAdapter {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    #[instrument(skip(self), fields(provider = self.provider.name()))]
    async fn fetch_current(&self, city: &str) -> Result<NormalizedWeather, ApplicationError> {
        let result = self
            .provider
            .fetch_current(city)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(reading) => debug!(temperature = reading.temperature(), "Retrieved current weather"),
            Err(e) => debug!(error = %e, "Failed to get current weather"),
        }

        result
    }
}

/// Build the configured weather sources in call order: Open-Meteo, then
/// OpenWeatherMap. Both share one HTTP connection pool.
pub fn build_weather_sources(
    config: &WeatherAppConfig,
) -> Result<Vec<Arc<dyn WeatherSourcePort>>, ApplicationError> {
    let http = Client::builder()
        .build()
        .map_err(|e| ApplicationError::Internal(e.to_string()))?;

    let open_meteo = OpenMeteoClient::with_http_client(config.open_meteo(), http.clone());
    let openweathermap = OpenWeatherMapClient::with_http_client(config.openweathermap(), http);

    Ok(vec![
        Arc::new(WeatherSourceAdapter::new(Arc::new(open_meteo))),
        Arc::new(WeatherSourceAdapter::new(Arc::new(openweathermap))),
    ])
}
