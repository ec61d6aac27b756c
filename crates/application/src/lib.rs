//! Application layer - Use cases and orchestration
//!
//! Defines the ports the refresh pipeline depends on (weather sources and the
//! city store) and the service that runs fetch → aggregate → save for a city.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
