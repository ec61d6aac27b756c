//! Normalized weather reading
//!
//! The common shape every provider response is converted into, and the
//! shape the aggregation step produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single current-conditions observation for one city
///
/// Immutable once constructed. Serialized with the field names the HTTP API
/// has always exposed (`temperature_c`, `humidity_percent`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    city: String,
    #[serde(rename = "temperature_c")]
    temperature: f64,
    #[serde(
        rename = "humidity_percent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    humidity: Option<f64>,
    source: String,
    time: DateTime<Utc>,
}

impl NormalizedWeather {
    /// Create a new reading
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        temperature: f64,
        humidity: Option<f64>,
        source: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            city: city.into(),
            temperature,
            humidity,
            source: source.into(),
            time,
        }
    }

    /// City the reading belongs to
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Temperature in degrees Celsius
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Relative humidity in percent, if the source reports it
    pub const fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// Provider tag, or `"aggregated"` for merged readings
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Observation time (UTC)
    pub const fn time(&self) -> DateTime<Utc> {
        self.time
    }
}
