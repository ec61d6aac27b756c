//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod weather_source_adapter;

pub use weather_source_adapter::{WeatherSourceAdapter, build_weather_sources};
