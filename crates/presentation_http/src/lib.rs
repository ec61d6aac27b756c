//! Weather aggregation HTTP presentation layer
//!
//! Serves the aggregated readings kept by the refresh scheduler: latest value,
//! history-backed forecast, health/status pages and a manual refresh endpoint.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use middleware::{RateLimiterConfig, RateLimiterLayer, RequestIdLayer};
pub use routes::{create_app, create_router};
pub use state::AppState;
