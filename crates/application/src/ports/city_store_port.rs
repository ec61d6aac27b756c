//! City store port
//!
//! Concurrent mapping from city to its cached [`CityEntry`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domain::{CityEntry, NormalizedWeather};
#[cfg(test)]
use mockall::automock;

/// Port for the per-city cache
///
/// Implementations must apply `save` atomically with respect to readers.
#[cfg_attr(test, automock)]
pub trait CityStorePort: Send + Sync {
    /// Store a new aggregate: replace the latest value, append to history,
    /// stamp the last successful fetch with the current time.
    fn save(&self, city: &str, aggregated: NormalizedWeather);

    /// Snapshot of the entry for `city`, `None` if nothing was ever saved
    fn get(&self, city: &str) -> Option<CityEntry>;

    /// Last successful fetch time of every known city
    fn all_last_fetches(&self) -> HashMap<String, DateTime<Utc>>;
}
