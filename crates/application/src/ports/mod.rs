//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod city_store_port;
mod weather_source_port;

#[cfg(test)]
pub use city_store_port::MockCityStorePort;
pub use city_store_port::CityStorePort;
#[cfg(test)]
pub use weather_source_port::MockWeatherSourcePort;
pub use weather_source_port::WeatherSourcePort;
