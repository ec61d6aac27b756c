//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Aggregation was requested without any readings
    #[error("Cannot aggregate an empty set of readings")]
    NoReadings,

    /// City name is empty or otherwise unusable as a cache key
    #[error("Invalid city: {0:?}")]
    InvalidCity(String),
}
