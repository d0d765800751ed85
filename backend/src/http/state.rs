//! Application state for the HTTP server.

use std::sync::Arc;

use super::cache::ResultCache;
use crate::api::{LocationDemand, TimePattern};
use crate::db::{AppConfig, TelemetryRepository};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Telemetry snapshot source
    pub repository: Arc<dyn TelemetryRepository>,
    pub config: Arc<AppConfig>,
    pub demand_cache: ResultCache<LocationDemand>,
    pub pattern_cache: ResultCache<TimePattern>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TelemetryRepository>, config: AppConfig) -> Self {
        let capacity = config.analysis.cache_capacity;
        Self {
            repository,
            config: Arc::new(config),
            demand_cache: ResultCache::new(capacity),
            pattern_cache: ResultCache::new(capacity),
        }
    }
}
