//! Logging initialization
//!
//! Console logging through `tracing-subscriber`, either human-readable text
//! or one JSON object per line.

mod logging;

pub use logging::{DEFAULT_LOG_FILTER, LogFormat, TelemetryError, init_logging};
