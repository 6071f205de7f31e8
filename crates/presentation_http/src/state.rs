//! Application state shared across handlers

use std::sync::Arc;

use application::{GddService, HealthService, VineyardService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Vineyard CRUD use cases
    pub vineyard_service: Arc<VineyardService>,
    /// Season accumulation pipeline
    pub gdd_service: Arc<GddService>,
    /// Readiness checks
    pub health_service: Arc<HealthService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
