//! Database health check port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Database health information
#[derive(Debug, Clone)]
pub struct DatabaseHealth {
    /// Whether the database answered a probe query
    pub reachable: bool,
    /// Engine version string, when the probe could read it
    pub version: Option<String>,
    /// Probe round-trip time in milliseconds
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    /// Create a healthy status with version info
    #[must_use]
    pub fn reachable(version: impl Into<String>) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            response_time_ms: None,
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            reachable: false,
            version: None,
            response_time_ms: None,
        }
    }

    /// Add response time to the health status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Port for database health checking operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Lightweight connectivity probe
    async fn is_available(&self) -> bool;

    /// Probe the database and report version and latency
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}
