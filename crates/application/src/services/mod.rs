//! Application services - Use case implementations

mod refresh_service;

pub use refresh_service::{RefreshReport, RefreshService, SourceFailure, SourceOutcome};
