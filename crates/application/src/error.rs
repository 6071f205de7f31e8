//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Requested entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Weather source failed or broke its one-observation-per-day contract
    #[error("Weather source error: {0}")]
    UpstreamWeather(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (persistence, serialization, ...)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Create a not found error for a vineyard ID
    pub fn vineyard_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Vineyard not found: {id}"))
    }

    /// Create an upstream weather error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamWeather(message.into())
    }

    /// Whether the error is caused by the caller's input
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::ValidationError(_) | DomainError::InvalidDateTime(_))
        )
    }

    /// Whether the error means the requested entity is absent
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
