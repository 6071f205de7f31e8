//! Open-Meteo adapter - Implements WeatherSourcePort using integration_weather

use application::error::ApplicationError;
use application::ports::WeatherSourcePort;
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DailyObservation, GeoLocation, TemperatureUnit};
use integration_weather::{
    DailyTemperature, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument, warn};

/// Weather source backed by the Open-Meteo historical archive
#[derive(Debug)]
pub struct OpenMeteoWeatherAdapter {
    client: OpenMeteoClient,
}

impl OpenMeteoWeatherAdapter {
    /// Create an adapter with the given client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Every archive failure means the pipeline cannot trust the season
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::RateLimitExceeded => {
                ApplicationError::upstream("Open-Meteo rate limit exceeded")
            },
            WeatherError::MissingData(date) => {
                ApplicationError::upstream(format!("Open-Meteo has no temperatures for {date}"))
            },
            other => ApplicationError::upstream(other.to_string()),
        }
    }

    fn to_observation(row: &DailyTemperature) -> DailyObservation {
        DailyObservation::new(row.date, row.temperature_max, row.temperature_min)
    }
}

#[async_trait]
impl WeatherSourcePort for OpenMeteoWeatherAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude(), %start, %end))]
    async fn get_historical_weather(
        &self,
        location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyObservation>, ApplicationError> {
        let result = self
            .client
            .get_daily_temperatures(location.latitude(), location.longitude(), start, end)
            .await;

        match result {
            Ok(rows) => {
                debug!(days = rows.len(), "Retrieved archived temperatures");
                Ok(rows.iter().map(Self::to_observation).collect())
            },
            Err(e) => {
                warn!(error = %e, "Failed to get archived temperatures");
                Err(Self::map_error(e))
            },
        }
    }

    fn temperature_unit(&self) -> TemperatureUnit {
        self.client.temperature_unit()
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
