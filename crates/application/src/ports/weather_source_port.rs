//! Weather source port
//!
//! One upstream provider able to report current conditions for a city.

use async_trait::async_trait;
use domain::NormalizedWeather;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for a single weather provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherSourcePort: Send + Sync {
    /// Provider tag, e.g. `open-meteo`
    fn name(&self) -> &'static str;

    /// Fetch a normalized reading for `city`
    ///
    /// Retries are the adapter's concern; an error here is final for this call.
    async fn fetch_current(&self, city: &str) -> Result<NormalizedWeather, ApplicationError>;
}
