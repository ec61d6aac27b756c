//! Caching layer
//!
//! The only cache is the per-city store the scheduler writes and the HTTP
//! handlers read.

mod city_store;

pub use city_store::{HistoryRetention, InMemoryCityStore};
