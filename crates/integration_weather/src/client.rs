//! Open-Meteo archive client
//!
//! HTTP client for the Open-Meteo Historical Weather API.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::TemperatureUnit;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ArchiveResponse, DailyTemperature};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The archive has no value for a day in the requested range
    #[error("No temperature data for {0}")]
    MissingData(NaiveDate),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Start date after end date
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Archive API base URL (default: <https://archive-api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Unit requested for all temperatures (default: fahrenheit)
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Commercial API key, sent as `apikey` when present
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            temperature_unit: TemperatureUnit::default(),
            api_key: None,
        }
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature_unit", &self.temperature_unit)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Weather client trait for fetching historical data
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Daily max/min temperatures for `[start, end]`, one entry per day
    async fn get_daily_temperatures(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTemperature>, WeatherError>;

    /// Check if the weather service is healthy
    async fn is_healthy(&self) -> bool;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// Unit the client requests temperatures in
    #[must_use]
    pub const fn temperature_unit(&self) -> TemperatureUnit {
        self.config.temperature_unit
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Query parameters for an archive request
    fn archive_query(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
            (
                "temperature_unit",
                self.config.temperature_unit.as_str().to_string(),
            ),
            ("timezone", "auto".to_string()),
        ];
        if let Some(ref key) = self.config.api_key {
            query.push(("apikey", key.clone()));
        }
        query
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, start = %start, end = %end))]
    async fn get_daily_temperatures(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTemperature>, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;
        if start > end {
            return Err(WeatherError::InvalidDateRange { start, end });
        }

        let url = format!("{}/archive", self.config.base_url);
        debug!(url = %url, "Fetching historical temperatures");

        let response = self
            .client
            .get(&url)
            .query(&self.archive_query(latitude, longitude, start, end))
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let api_response: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(
            grid_lat = api_response.latitude,
            grid_lon = api_response.longitude,
            timezone = api_response.timezone.as_deref().unwrap_or("GMT"),
            "Archive response received"
        );

        let daily = api_response.daily.ok_or_else(|| {
            WeatherError::ParseError("No daily data in response".to_string())
        })?;

        daily.into_temperatures()
    }

    async fn is_healthy(&self) -> bool {
        // A single archived day at a fixed point is the cheapest useful probe
        let day = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap_or_default();
        self.get_daily_temperatures(52.52, 13.41, day, day)
            .await
            .is_ok()
    }
}
