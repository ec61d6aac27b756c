//! Value Objects - Immutable, identity-less domain primitives

mod city_name;

pub use city_name::CityName;
