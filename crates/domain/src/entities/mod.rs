//! Domain entities

mod city_entry;
mod normalized_weather;

pub use city_entry::CityEntry;
pub use normalized_weather::NormalizedWeather;
