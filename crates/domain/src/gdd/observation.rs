//! Daily weather observation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Maximum and minimum temperature recorded on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    date: NaiveDate,
    max_temp: f64,
    min_temp: f64,
}

impl DailyObservation {
    #[must_use]
    pub const fn new(date: NaiveDate, max_temp: f64, min_temp: f64) -> Self {
        Self {
            date,
            max_temp,
            min_temp,
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn max_temp(&self) -> f64 {
        self.max_temp
    }

    #[must_use]
    pub const fn min_temp(&self) -> f64 {
        self.min_temp
    }

    /// Whether the reported maximum is below the reported minimum
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.max_temp < self.min_temp
    }

    /// Reject readings that cannot take part in arithmetic
    ///
    /// # Errors
    ///
    /// Returns `InvalidObservation` when either temperature is NaN or infinite.
    pub fn ensure_finite(&self) -> Result<(), DomainError> {
        if self.max_temp.is_finite() && self.min_temp.is_finite() {
            Ok(())
        } else {
            Err(DomainError::invalid_observation(format!(
                "non-finite temperature on {}",
                self.date
            )))
        }
    }
}
