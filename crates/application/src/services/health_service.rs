//! Health aggregation service
//!
//! Runs readiness probes against the weather source and the database with
//! configurable timeouts and reports each dependency individually.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::ports::{DatabaseHealthPort, WeatherSourcePort};

/// Default global timeout for health checks in seconds
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Configuration for health check behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Global timeout for all health checks in seconds (default: 5)
    #[serde(default = "default_global_timeout")]
    pub global_timeout_secs: u64,

    /// Service-specific timeout overrides in seconds
    #[serde(default)]
    pub service_timeouts: HashMap<String, u64>,
}

const fn default_global_timeout() -> u64 {
    DEFAULT_HEALTH_CHECK_TIMEOUT_SECS
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            global_timeout_secs: default_global_timeout(),
            service_timeouts: HashMap::new(),
        }
    }
}

impl HealthConfig {
    /// Get the timeout for a specific service
    #[must_use]
    pub fn timeout_for_service(&self, service: &str) -> Duration {
        let secs = self
            .service_timeouts
            .get(service)
            .copied()
            .unwrap_or(self.global_timeout_secs);
        Duration::from_secs(secs)
    }
}

/// Status of an individual dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub healthy: bool,
    /// Optional additional information (e.g. engine version)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            healthy: true,
            info: None,
            response_time_ms: None,
            error: None,
        }
    }

    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            info: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    /// Create an unhealthy status due to timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }

    /// Status for a dependency that is not wired in
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            healthy: true,
            info: Some("Service not configured".to_string()),
            response_time_ms: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Health report for all dependencies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True if every dependency is healthy
    pub healthy: bool,
    pub services: HashMap<String, ServiceHealth>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    #[must_use]
    pub fn new(services: HashMap<String, ServiceHealth>) -> Self {
        let healthy = services.values().all(|s| s.healthy);

        Self {
            healthy,
            services,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Get status of a specific dependency
    #[must_use]
    pub fn service_status(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }
}

/// Aggregates readiness of the weather source and the database
pub struct HealthService {
    config: HealthConfig,
    weather: Arc<dyn WeatherSourcePort>,
    database: Option<Arc<dyn DatabaseHealthPort>>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("config", &self.config)
            .field("database", &self.database.is_some())
            .finish_non_exhaustive()
    }
}

impl HealthService {
    #[must_use]
    pub fn new(weather: Arc<dyn WeatherSourcePort>) -> Self {
        Self {
            config: HealthConfig::default(),
            weather,
            database: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: HealthConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: Arc<dyn DatabaseHealthPort>) -> Self {
        self.database = Some(database);
        self
    }

    /// Check every dependency
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let (weather, database) = tokio::join!(self.check_weather(), self.check_database());

        let mut services = HashMap::new();
        services.insert("weather".to_string(), weather);
        services.insert("database".to_string(), database);

        HealthReport::new(services)
    }

    /// Probe the weather source
    #[instrument(skip(self))]
    pub async fn check_weather(&self) -> ServiceHealth {
        let timeout_duration = self.config.timeout_for_service("weather");
        let start = Instant::now();

        let Ok(available) = timeout(timeout_duration, self.weather.is_available()).await else {
            warn!("Weather health check timed out");
            return ServiceHealth::timeout();
        };

        let response_time = elapsed_ms(start);
        if available {
            debug!(response_time_ms = response_time, "Weather source healthy");
            ServiceHealth::healthy()
                .with_info(self.weather.temperature_unit().as_str())
                .with_response_time(response_time)
        } else {
            warn!(response_time_ms = response_time, "Weather source unhealthy");
            ServiceHealth::unhealthy("Weather source unavailable").with_response_time(response_time)
        }
    }

    /// Probe the database
    #[instrument(skip(self))]
    pub async fn check_database(&self) -> ServiceHealth {
        let Some(ref database) = self.database else {
            return ServiceHealth::unconfigured();
        };

        let timeout_duration = self.config.timeout_for_service("database");
        let start = Instant::now();

        match timeout(timeout_duration, database.check_health()).await {
            Ok(Ok(health)) if health.reachable => {
                let response_time = health.response_time_ms.unwrap_or_else(|| elapsed_ms(start));
                debug!(response_time_ms = response_time, "Database healthy");
                let status = ServiceHealth::healthy().with_response_time(response_time);
                match health.version {
                    Some(version) => status.with_info(version),
                    None => status,
                }
            },
            Ok(Ok(_)) => {
                warn!("Database unreachable");
                ServiceHealth::unhealthy("Database unreachable")
                    .with_response_time(elapsed_ms(start))
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Database health check failed");
                ServiceHealth::unhealthy(e.to_string()).with_response_time(elapsed_ms(start))
            },
            Err(_) => {
                warn!("Database health check timed out");
                ServiceHealth::timeout()
            },
        }
    }
}

// A health check timeout is a few seconds, far below u64::MAX milliseconds
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
