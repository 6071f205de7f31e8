//! API error handling
//!
//! Maps application errors onto HTTP status codes and a uniform
//! `{ error, code, details? }` body. In production mode, internal errors
//! return generic messages without details.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details should be exposed in responses.
///
/// Set to `false` in production so that database and upstream messages
/// never reach clients.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The weather source failed or returned an unusable series
    #[error("Weather source error: {0}")]
    UpstreamWeather(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The 404 for any unknown or malformed vineyard ID
    #[must_use]
    pub fn vineyard_not_found() -> Self {
        Self::NotFound("Vineyard not found".to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({"error": "Vineyard not found", "code": "not_found"}))]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Additional error details (development mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub(crate) fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            Self::UpstreamWeather(msg) => {
                error!(error = %msg, "Season GDD calculation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_weather",
                    "Failed to calculate GDD".to_string(),
                    should_expose_details().then_some(msg),
                )
            },
            Self::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    should_expose_details().then_some(msg),
                )
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(_) => Self::vineyard_not_found(),
            ApplicationError::Domain(
                e @ (DomainError::ValidationError(_) | DomainError::InvalidDateTime(_)),
            ) => Self::BadRequest(e.to_string()),
            ApplicationError::Domain(e @ DomainError::InvalidObservation(_)) => {
                Self::UpstreamWeather(e.to_string())
            },
            ApplicationError::UpstreamWeather(msg) => Self::UpstreamWeather(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_converts_to_bad_request() {
        let source = ApplicationError::Domain(DomainError::validation("name must not be empty"));
        let ApiError::BadRequest(msg) = ApiError::from(source) else {
            unreachable!("Expected BadRequest");
        };
        assert!(msg.contains("name must not be empty"));
    }

    #[test]
    fn not_found_converts_to_generic_message() {
        let result = ApiError::from(ApplicationError::vineyard_not_found("abc"));
        let ApiError::NotFound(msg) = result else {
            unreachable!("Expected NotFound");
        };
        assert_eq!(msg, "Vineyard not found");
    }

    #[test]
    fn upstream_converts() {
        let source = ApplicationError::upstream("gap at 2024-03-02");
        assert!(matches!(
            ApiError::from(source),
            ApiError::UpstreamWeather(_)
        ));
    }

    #[test]
    fn configuration_and_internal_convert_to_internal() {
        for source in [
            ApplicationError::Configuration("bad".to_string()),
            ApplicationError::Internal("db".to_string()),
        ] {
            assert!(matches!(ApiError::from(source), ApiError::Internal(_)));
        }
    }

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::vineyard_not_found(), StatusCode::NOT_FOUND),
            (
                ApiError::UpstreamWeather("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn error_response_skips_empty_details() {
        let json = serde_json::to_string(&ErrorResponse::new("Vineyard not found", "not_found"))
            .unwrap();
        assert_eq!(json, r#"{"error":"Vineyard not found","code":"not_found"}"#);
    }
}
