//! Provider contract and shared HTTP plumbing

use std::time::Duration;

use async_trait::async_trait;
use domain::NormalizedWeather;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::retry::{RetryConfig, Retryable, retry};

/// Weather provider errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection failure or timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
    },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// A required setting (such as an API key) is missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// The city could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Retryable for WeatherError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::UpstreamStatus { .. } | Self::Decode(_)
        )
    }
}

/// A source of current weather conditions for a city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short tag identifying the provider, used as the reading's source
    fn name(&self) -> &'static str;

    /// Fetch current conditions for `city`
    async fn fetch_current(&self, city: &str) -> Result<NormalizedWeather, WeatherError>;
}

/// Build an HTTP client with the given default timeout
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| WeatherError::Transport(e.to_string()))
}

/// One GET attempt: send, check status, decode the JSON body
async fn get_json_once<T, Q>(
    client: &Client,
    url: &str,
    query: &Q,
    timeout: Duration,
) -> Result<T, WeatherError>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
{
    let response = client
        .get(url)
        .query(query)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| WeatherError::Transport(e.without_url().to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(WeatherError::UpstreamStatus {
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| WeatherError::Transport(e.without_url().to_string()))?;

    serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))
}

/// GET `url` with `query` and decode JSON, retrying per `policy`
///
/// The URL is logged without its query string, which may carry credentials.
pub(crate) async fn get_json<T, Q>(
    client: &Client,
    url: &str,
    query: &Q,
    timeout: Duration,
    policy: &RetryConfig,
) -> Result<T, WeatherError>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
{
    debug!(url = %url, "Requesting upstream");
    retry(policy, || get_json_once(client, url, query, timeout)).await
}
