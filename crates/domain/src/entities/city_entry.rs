//! Cached state for one city

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::NormalizedWeather;

/// Latest aggregate, history and last fetch time for a single city
///
/// Entries only exist once a first aggregate has been saved, and `aggregated`
/// is always the last element of `history`.
#[derive(Debug, Clone, Serialize)]
pub struct CityEntry {
    aggregated: Option<NormalizedWeather>,
    history: Vec<NormalizedWeather>,
    last_successful_fetch: DateTime<Utc>,
}

impl CityEntry {
    /// Start an entry from its first aggregated reading
    #[must_use]
    pub fn first(aggregated: NormalizedWeather, fetched_at: DateTime<Utc>) -> Self {
        Self {
            aggregated: Some(aggregated.clone()),
            history: vec![aggregated],
            last_successful_fetch: fetched_at,
        }
    }

    /// Record a newer aggregate: replaces the latest value and appends it to history
    pub fn record(&mut self, aggregated: NormalizedWeather, fetched_at: DateTime<Utc>) {
        self.aggregated = Some(aggregated.clone());
        self.history.push(aggregated);
        self.last_successful_fetch = fetched_at;
    }

    /// Drop the oldest history entries so that at most `keep` remain.
    ///
    /// `keep` of zero is ignored; the latest aggregate always stays in history.
    pub fn retain_latest(&mut self, keep: usize) {
        if keep == 0 || self.history.len() <= keep {
            return;
        }
        let excess = self.history.len() - keep;
        self.history.drain(..excess);
    }

    /// Most recent aggregated reading
    pub const fn aggregated(&self) -> Option<&NormalizedWeather> {
        self.aggregated.as_ref()
    }

    /// Aggregated readings, oldest first
    pub fn history(&self) -> &[NormalizedWeather] {
        &self.history
    }

    /// Time of the most recent successful save
    pub const fn last_successful_fetch(&self) -> DateTime<Utc> {
        self.last_successful_fetch
    }
}
