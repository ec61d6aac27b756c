//! Refresh pipeline
//!
//! For one city: ask every weather source, keep the readings that succeeded
//! (in source order), aggregate them and save the result. When no source
//! succeeds the store is left untouched.

use std::fmt;
use std::sync::Arc;

use domain::{NormalizedWeather, aggregate};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{CityStorePort, WeatherSourcePort};

/// Result of asking a single source
#[derive(Debug)]
pub struct SourceOutcome {
    /// Provider tag
    pub source: &'static str,
    /// Reading or the provider's final error
    pub result: Result<NormalizedWeather, ApplicationError>,
}

/// Everything one detailed refresh produced
#[derive(Debug)]
pub struct RefreshReport {
    /// City key the refresh ran for
    pub city: String,
    /// Per-source outcomes, in source order
    pub outcomes: Vec<SourceOutcome>,
    /// The saved aggregate, if any source succeeded
    pub aggregated: Option<NormalizedWeather>,
}

/// Serializable view of a source failure
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    /// Provider tag
    pub source: &'static str,
    /// Error message
    pub error: String,
}

impl RefreshReport {
    /// Successful readings, in source order
    pub fn readings(&self) -> impl Iterator<Item = (&'static str, &NormalizedWeather)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.source, r)))
    }

    /// Failed sources with their error messages, in source order
    pub fn failures(&self) -> Vec<SourceFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.result.as_ref().err().map(|e| SourceFailure {
                    source: o.source,
                    error: e.to_string(),
                })
            })
            .collect()
    }
}

/// Runs the fetch → aggregate → save pipeline
pub struct RefreshService {
    sources: Vec<Arc<dyn WeatherSourcePort>>,
    store: Arc<dyn CityStorePort>,
}

impl fmt::Debug for RefreshService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshService")
            .field("sources", &self.source_names())
            .finish_non_exhaustive()
    }
}

impl RefreshService {
    /// Create a service over `sources`
    ///
    /// Source order matters: when several sources report humidity, the
    /// first one in this list wins.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn WeatherSourcePort>>, store: Arc<dyn CityStorePort>) -> Self {
        Self { sources, store }
    }

    /// Provider tags, in call order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// The store aggregates are written to
    pub fn store(&self) -> &Arc<dyn CityStorePort> {
        &self.store
    }

    /// Ask every source concurrently; outcomes keep source order
    pub async fn fetch_all(&self, city: &str) -> Vec<SourceOutcome> {
        let calls = self.sources.iter().map(|source| async move {
            let result = source.fetch_current(city).await;
            match result {
                Err(ref e) if e.is_transient() => {
                    warn!(city = %city, provider = source.name(), error = %e, "Provider fetch failed");
                },
                Err(ref e) => {
                    debug!(city = %city, provider = source.name(), error = %e, "Provider skipped");
                },
                Ok(_) => {},
            }
            SourceOutcome {
                source: source.name(),
                result,
            }
        });
        join_all(calls).await
    }

    /// Refresh one city and save the aggregate
    ///
    /// Returns `Ok(None)` when every source failed; the store is not touched
    /// in that case.
    #[instrument(skip(self))]
    pub async fn refresh_city(
        &self,
        city: &str,
    ) -> Result<Option<NormalizedWeather>, ApplicationError> {
        let outcomes = self.fetch_all(city).await;
        self.aggregate_and_save(city, &outcomes)
    }

    /// Refresh one city and report every source's result alongside the aggregate
    #[instrument(skip(self))]
    pub async fn refresh_city_detailed(
        &self,
        city: &str,
    ) -> Result<RefreshReport, ApplicationError> {
        let outcomes = self.fetch_all(city).await;
        let aggregated = self.aggregate_and_save(city, &outcomes)?;
        Ok(RefreshReport {
            city: city.to_string(),
            outcomes,
            aggregated,
        })
    }

    fn aggregate_and_save(
        &self,
        city: &str,
        outcomes: &[SourceOutcome],
    ) -> Result<Option<NormalizedWeather>, ApplicationError> {
        let readings: Vec<NormalizedWeather> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().cloned())
            .collect();

        if readings.is_empty() {
            debug!(city = %city, "No provider succeeded, keeping cached entry");
            return Ok(None);
        }

        let aggregated = aggregate(city, &readings)?;
        self.store.save(city, aggregated.clone());

        info!(
            city = %city,
            sources = readings.len(),
            temperature_c = aggregated.temperature(),
            "Saved aggregated reading"
        );
        Ok(Some(aggregated))
    }
}
