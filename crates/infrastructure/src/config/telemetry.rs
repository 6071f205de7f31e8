//! Telemetry configuration.

use serde::{Deserialize, Serialize};

/// Telemetry configuration for OpenTelemetry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// Enable OTLP trace export
    #[serde(default)]
    pub enabled: bool,

    /// OTLP endpoint URL
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,

    /// Sample ratio (0.0 to 1.0)
    #[serde(default)]
    pub sample_ratio: Option<f64>,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_log_filter() -> String {
    "info,tower_http=info,sqlx=warn".to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            sample_ratio: Some(1.0),
            log_filter: default_log_filter(),
        }
    }
}

impl TelemetryAppConfig {
    /// Build the telemetry initialization config
    #[must_use]
    pub fn to_telemetry_config(&self, json_logs: bool) -> crate::telemetry::TelemetryConfig {
        crate::telemetry::TelemetryConfig {
            enabled: self.enabled,
            endpoint: self.otlp_endpoint.clone(),
            sampling_ratio: self.sample_ratio.unwrap_or(1.0),
            log_filter: self.log_filter.clone(),
            json_logs,
            ..crate::telemetry::TelemetryConfig::default()
        }
    }
}
