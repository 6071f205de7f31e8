//! Health check handlers

use std::collections::BTreeMap;

use application::{HealthReport, ServiceHealth};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "Server is running!",
    "timestamp": "2024-06-01T12:00:00Z",
    "version": "0.2.0"
}))]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Liveness check - is the server running?
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running!".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Status of one dependency
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub healthy: bool,
    /// Version or unit information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ServiceHealth> for ServiceStatus {
    fn from(health: ServiceHealth) -> Self {
        Self {
            healthy: health.healthy,
            info: health.info,
            response_time_ms: health.response_time_ms,
            error: health.error,
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Per-dependency status, keyed by dependency name
    pub services: BTreeMap<String, ServiceStatus>,
    pub checked_at: DateTime<Utc>,
}

impl From<HealthReport> for ReadinessResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            ready: report.healthy,
            services: report
                .services
                .into_iter()
                .map(|(name, health)| (name, health.into()))
                .collect(),
            checked_at: report.checked_at,
        }
    }
}

/// Readiness check - can the server compute seasons right now?
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies healthy", body = ReadinessResponse),
        (status = 503, description = "A dependency is unhealthy", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let response = ReadinessResponse::from(state.health_service.check_all().await);

    let status_code = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
