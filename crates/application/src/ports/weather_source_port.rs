//! Weather source port
//!
//! Defines the interface for retrieving historical daily temperatures.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DailyObservation, GeoLocation, TemperatureUnit};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for daily temperature observations
///
/// Implementations must return exactly one observation per calendar day in
/// `[start, end]`, ascending, with no gaps or duplicates. The GDD pipeline
/// verifies this and rejects any response that breaks it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherSourcePort: Send + Sync {
    /// Fetch daily max/min temperatures for an inclusive date range
    ///
    /// Called once per season computation with the whole window.
    async fn get_historical_weather(
        &self,
        location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyObservation>, ApplicationError>;

    /// Unit of the temperatures this source returns
    fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Fahrenheit
    }

    /// Check if the weather source is reachable
    async fn is_available(&self) -> bool;
}
