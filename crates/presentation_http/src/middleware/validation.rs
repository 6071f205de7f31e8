//! Request validation
//!
//! Provides a `ValidatedJson` extractor that deserializes a JSON body and runs
//! its `validator` rules, rejecting with a 400 in the API error format.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::ErrorResponse;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        // Malformed, mistyped and unlabelled bodies are all the caller's fault
        let message = match &self {
            Self::JsonError(e) => e.body_text(),
            Self::ValidationFailed(msg) => msg.clone(),
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(message, "validation_error")),
        )
            .into_response()
    }
}

/// A JSON extractor that also validates the request body
///
/// ```ignore
/// async fn handler(ValidatedJson(req): ValidatedJson<CreateVineyardRequest>) {
///     // req passed its validator rules
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(|e| {
            let mut messages = Vec::new();
            collect_messages(&e, "", &mut messages);
            messages.sort();
            ValidationError::ValidationFailed(messages.join("; "))
        })?;

        Ok(Self(value))
    }
}

/// Flatten nested validation errors into `path.to.field: message` strings
fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string);
                    format!("{path}: {message}")
                }));
            },
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(inner, &format!("{path}[{index}]"), out);
                }
            },
        }
    }
}
