//! Domain-level errors

use thiserror::Error;

use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    /// A weather observation sequence broke the one-per-day contract
    #[error("Invalid observation data: {0}")]
    InvalidObservation(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Create an invalid observation error
    pub fn invalid_observation(message: impl Into<String>) -> Self {
        Self::InvalidObservation(message.into())
    }
}

impl From<InvalidCoordinates> for DomainError {
    fn from(err: InvalidCoordinates) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_message() {
        let err = DomainError::validation("name is required");
        assert_eq!(err.to_string(), "Validation failed: name is required");
    }

    #[test]
    fn invalid_datetime_error_message() {
        let err = DomainError::InvalidDateTime("13-45".to_string());
        assert_eq!(err.to_string(), "Invalid date/time: 13-45");
    }

    #[test]
    fn invalid_observation_error_message() {
        let err = DomainError::invalid_observation("gap on 2024-03-02");
        assert_eq!(err.to_string(), "Invalid observation data: gap on 2024-03-02");
    }

    #[test]
    fn invalid_coordinates_become_validation_errors() {
        let err: DomainError = InvalidCoordinates.into();
        assert!(matches!(err, DomainError::ValidationError(_)));
        assert!(err.to_string().contains("latitude"));
    }
}
