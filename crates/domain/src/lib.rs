//! Domain layer for the weather aggregation service
//!
//! Contains the normalized reading type, the per-city cache entry, the
//! multi-source aggregation rule and domain errors.
//! This layer performs no I/O.

pub mod aggregation;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use aggregation::{AGGREGATED_SOURCE, aggregate};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
