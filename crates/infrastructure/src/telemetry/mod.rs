//! Logging and distributed tracing
//!
//! Console logging through `tracing-subscriber`, with optional OpenTelemetry
//! export over OTLP.

mod otel;

pub use otel::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
