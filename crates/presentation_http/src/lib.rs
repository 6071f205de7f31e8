//! Vigneron HTTP presentation layer
//!
//! This crate provides the HTTP API for vineyard sites and season GDD series.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{RequestIdLayer, ValidatedJson, ValidationError};
pub use routes::{build_app, create_router};
pub use shutdown::{ShutdownOutcome, serve_with_drain_timeout};
pub use state::AppState;
