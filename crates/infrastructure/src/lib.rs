//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the in-memory city
//! store and the weather source adapters. Also hosts configuration loading,
//! logging setup, page templates and the periodic refresh scheduler.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod scheduler;
pub mod telemetry;
pub mod templates;

pub use adapters::*;
pub use cache::{HistoryRetention, InMemoryCityStore};
pub use config::{AppConfig, ServerConfig, WeatherAppConfig};
pub use scheduler::{CycleSummary, FlightPermit, RefreshScheduler, SingleFlight};
pub use telemetry::{LogFormat, TelemetryError, init_logging};
pub use templates::{StatusRow, TemplateEngine, TemplateError};
