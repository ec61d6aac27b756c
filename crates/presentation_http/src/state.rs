//! Application state shared across handlers

use std::sync::Arc;
use std::time::Instant;

use application::{CityStorePort, RefreshService};
use infrastructure::{TemplateEngine, TemplateError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Store the handlers read aggregates from
    pub store: Arc<dyn CityStorePort>,
    /// Pipeline used by the debug endpoint
    pub refresh: Arc<RefreshService>,
    /// Compiled page templates
    pub templates: TemplateEngine,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("refresh", &self.refresh)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state around a refresh service, reading from its store
    pub fn new(refresh: Arc<RefreshService>) -> Result<Self, TemplateError> {
        Ok(Self {
            store: Arc::clone(refresh.store()),
            refresh,
            templates: TemplateEngine::new()?,
            started_at: Instant::now(),
        })
    }
}
