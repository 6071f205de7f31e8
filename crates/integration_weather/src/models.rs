//! Weather data models
//!
//! Wire types of the Open-Meteo archive endpoint and the parsed daily series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::WeatherError;

/// Daily temperature extremes for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
}

/// Archive API response (only the fields we request)
#[derive(Debug, Deserialize)]
pub(crate) struct ArchiveResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    pub daily: Option<DailyData>,
}

/// Column-oriented daily data; the archive reports gaps as `null`
#[derive(Debug, Deserialize)]
pub(crate) struct DailyData {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

impl DailyData {
    /// Zip the columns into per-day rows
    pub(crate) fn into_temperatures(self) -> Result<Vec<DailyTemperature>, WeatherError> {
        let len = self.time.len();
        if self.temperature_2m_max.len() != len || self.temperature_2m_min.len() != len {
            return Err(WeatherError::ParseError(format!(
                "daily columns differ in length: time={len}, max={}, min={}",
                self.temperature_2m_max.len(),
                self.temperature_2m_min.len()
            )));
        }

        self.time
            .iter()
            .zip(self.temperature_2m_max)
            .zip(self.temperature_2m_min)
            .map(|((time, max), min)| {
                let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
                    .map_err(|e| WeatherError::ParseError(format!("Invalid date '{time}': {e}")))?;
                match (max, min) {
                    (Some(temperature_max), Some(temperature_min)) => Ok(DailyTemperature {
                        date,
                        temperature_max,
                        temperature_min,
                    }),
                    _ => Err(WeatherError::MissingData(date)),
                }
            })
            .collect()
    }
}
