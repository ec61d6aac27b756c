//! Weather provider integrations
//!
//! Clients that turn a city name into a [`domain::NormalizedWeather`]:
//! - Open-Meteo (<https://open-meteo.com>), geocoding plus current weather, no API key
//! - OpenWeatherMap (<https://openweathermap.org>), current weather, API key required
//!
//! Every network call goes through the shared [`RetryConfig`] policy.

pub mod client;
mod models;
pub mod open_meteo;
pub mod openweathermap;
pub mod retry;

pub use client::{WeatherError, WeatherProvider};
pub use open_meteo::{OpenMeteoClient, OpenMeteoConfig};
pub use openweathermap::{OpenWeatherMapClient, OpenWeatherMapConfig};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
