//! In-memory city store
//!
//! One `RwLock` guards the whole map: saves take the write lock, reads take
//! the read lock and hand out owned snapshots.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use application::ports::CityStorePort;
use chrono::{DateTime, Utc};
use domain::{CityEntry, NormalizedWeather};
use parking_lot::RwLock;
use tracing::debug;

/// How much history each city keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryRetention {
    /// Keep every aggregate ever saved
    #[default]
    Unbounded,
    /// Keep only the newest `n` aggregates
    Latest(usize),
}

/// Process-local store of aggregated readings per city
#[derive(Debug, Default)]
pub struct InMemoryCityStore {
    entries: RwLock<HashMap<String, CityEntry>>,
    retention: HistoryRetention,
}

impl InMemoryCityStore {
    /// Create an empty store that keeps full history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given history policy
    #[must_use]
    pub fn with_retention(retention: HistoryRetention) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// Number of cities with at least one saved aggregate
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been saved yet
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CityStorePort for InMemoryCityStore {
    fn save(&self, city: &str, aggregated: NormalizedWeather) {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let entry = match entries.entry(city.to_string()) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                entry.record(aggregated, now);
                entry
            },
            Entry::Vacant(vacant) => vacant.insert(CityEntry::first(aggregated, now)),
        };
        if let HistoryRetention::Latest(keep) = self.retention {
            entry.retain_latest(keep);
        }
        debug!(city = %city, history = entry.history().len(), "Stored aggregate");
    }

    fn get(&self, city: &str) -> Option<CityEntry> {
        self.entries.read().get(city).cloned()
    }

    fn all_last_fetches(&self) -> HashMap<String, DateTime<Utc>> {
        self.entries
            .read()
            .iter()
            .map(|(city, entry)| (city.clone(), entry.last_successful_fetch()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn reading(city: &str, temp: f64) -> NormalizedWeather {
        NormalizedWeather::new(
            city,
            temp,
            Some(50.0),
            domain::AGGREGATED_SOURCE,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn unknown_city_is_not_found() {
        let store = InMemoryCityStore::new();
        assert!(store.get("Berlin").is_none());
        assert!(store.all_last_fetches().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn first_save_creates_entry() {
        let store = InMemoryCityStore::new();
        let before = Utc::now();
        store.save("Paris", reading("Paris", 15.0));

        let entry = store.get("Paris").unwrap();
        assert_eq!(entry.aggregated(), Some(&reading("Paris", 15.0)));
        assert_eq!(entry.history().len(), 1);
        assert!(entry.last_successful_fetch() >= before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn history_is_append_only() {
        let store = InMemoryCityStore::new();
        for temp in [10.0, 11.0, 12.0] {
            store.save("Oslo", reading("Oslo", temp));
        }

        let entry = store.get("Oslo").unwrap();
        let temps: Vec<f64> = entry.history().iter().map(NormalizedWeather::temperature).collect();
        assert_eq!(temps, vec![10.0, 11.0, 12.0]);
        assert_eq!(entry.aggregated(), entry.history().last());
    }

    #[test]
    fn latest_retention_drops_oldest() {
        let store = InMemoryCityStore::with_retention(HistoryRetention::Latest(2));
        for temp in [1.0, 2.0, 3.0, 4.0] {
            store.save("Rome", reading("Rome", temp));
        }

        let entry = store.get("Rome").unwrap();
        let temps: Vec<f64> = entry.history().iter().map(NormalizedWeather::temperature).collect();
        assert_eq!(temps, vec![3.0, 4.0]);
        assert_eq!(entry.aggregated().map(NormalizedWeather::temperature), Some(4.0));
    }

    #[test]
    fn snapshots_are_independent_of_later_saves() {
        let store = InMemoryCityStore::new();
        store.save("Lima", reading("Lima", 20.0));
        let snapshot = store.get("Lima").unwrap();
        let fetches = store.all_last_fetches();

        store.save("Lima", reading("Lima", 21.0));
        store.save("Quito", reading("Quito", 14.0));

        assert_eq!(snapshot.history().len(), 1);
        assert_eq!(fetches.len(), 1);
        assert_eq!(store.all_last_fetches().len(), 2);
    }

    #[test]
    fn last_fetch_advances_on_save() {
        let store = InMemoryCityStore::new();
        store.save("Cairo", reading("Cairo", 30.0));
        let first = store.all_last_fetches()["Cairo"];
        store.save("Cairo", reading("Cairo", 31.0));
        assert!(store.all_last_fetches()["Cairo"] >= first);
    }

    #[test]
    fn concurrent_saves_for_different_cities() {
        let store = Arc::new(InMemoryCityStore::new());
        let cities = ["Paris", "Berlin", "Tokyo", "Lima", "Oslo", "Cairo", "Delhi", "Perth"];

        std::thread::scope(|scope| {
            for city in cities {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for i in 0..50 {
                        store.save(city, reading(city, f64::from(i)));
                    }
                });
            }
        });

        assert_eq!(store.len(), cities.len());
        for city in cities {
            let entry = store.get(city).unwrap();
            assert_eq!(entry.history().len(), 50);
            assert_eq!(entry.aggregated().map(NormalizedWeather::temperature), Some(49.0));
        }
    }
}
