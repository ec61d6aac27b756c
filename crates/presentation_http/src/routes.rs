//! Route definitions and middleware stack

use axum::{Router, routing::get};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers,
    middleware::{RateLimiterLayer, RequestIdLayer},
    state::AppState,
};

/// Create the API router with all routes under `/api/v1`
pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        // Health and status endpoints
        .route("/status", get(handlers::health::status_page))
        .route("/health", get(handlers::health::health_check))
        // Weather API
        .route("/weather/current", get(handlers::weather::current))
        .route("/weather/forecast", get(handlers::weather::forecast))
        // Manual refresh
        .route("/debug/fetch", get(handlers::debug::fetch_now));

    Router::new()
        .nest("/api/v1", v1)
        // Attach state
        .with_state(state)
}

/// Router wrapped in the full middleware stack.
///
/// Outermost first: request id, tracing, CORS, rate limiting, panic recovery.
pub fn create_app(state: AppState, rate_limiter: RateLimiterLayer) -> Router {
    create_router(state)
        .layer(CatchPanicLayer::new())
        .layer(rate_limiter)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new())
}

