//! Synthetic weather source
//!
//! Seasonal sine-curve model that stands in for a real archive when the
//! service runs offline. Temperatures peak in late June and bottom out in
//! late December, with up to ±10°F of uniform daily jitter shared by the
//! high and the low.

use std::f64::consts::PI;

use application::error::ApplicationError;
use application::ports::WeatherSourcePort;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use domain::{DailyObservation, GeoLocation, SeasonDates, TemperatureUnit};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, instrument};

/// Annual mean of the model, in °F
const MEAN_TEMP_F: f64 = 45.0;
/// Half the peak-to-trough swing of the model, in °F
const AMPLITUDE_F: f64 = 20.0;
/// Day of year where the curve crosses the mean on the way up
const PHASE_DAY: f64 = 80.0;
/// Width of the uniform daily jitter, in °F
const JITTER_RANGE_F: f64 = 20.0;

/// Weather source generating plausible temperatures without network access
#[derive(Debug, Clone, Default)]
pub struct SyntheticWeatherAdapter {
    seed: Option<u64>,
    unit: TemperatureUnit,
}

impl SyntheticWeatherAdapter {
    /// Create an unseeded Fahrenheit model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the seed so identical requests return identical series
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Report temperatures in the given unit
    #[must_use]
    pub const fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Seasonal baseline for a date, before jitter, in °F
    #[must_use]
    pub fn baseline_fahrenheit(date: NaiveDate) -> f64 {
        let day_of_year = f64::from(date.ordinal());
        MEAN_TEMP_F + AMPLITUDE_F * ((day_of_year - PHASE_DAY) * PI / 180.0).sin()
    }

    fn request_rng(&self, location: &GeoLocation, start: NaiveDate) -> StdRng {
        match self.seed {
            Some(seed) => {
                // Mix the request into the seed so different sites differ
                let mixed = seed
                    ^ location.latitude().to_bits().rotate_left(17)
                    ^ location.longitude().to_bits().rotate_left(41)
                    ^ u64::from(start.num_days_from_ce().unsigned_abs());
                StdRng::seed_from_u64(mixed)
            },
            None => StdRng::from_os_rng(),
        }
    }

    fn generate(&self, rng: &mut impl Rng, dates: &SeasonDates) -> Vec<DailyObservation> {
        dates
            .days()
            .map(|date| {
                let base = Self::baseline_fahrenheit(date);
                let jitter = (rng.random::<f64>() - 0.5) * JITTER_RANGE_F;
                let max = round_half_up(base + 10.0 + jitter);
                let min = round_half_up(base - 5.0 + jitter);
                DailyObservation::new(
                    date,
                    self.unit.from_fahrenheit(max),
                    self.unit.from_fahrenheit(min),
                )
            })
            .collect()
    }
}

/// Round to the nearest whole degree, halves toward positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[async_trait]
impl WeatherSourcePort for SyntheticWeatherAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude(), %start, %end))]
    async fn get_historical_weather(
        &self,
        location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyObservation>, ApplicationError> {
        let dates = SeasonDates::new(start, end)
            .map_err(|e| ApplicationError::upstream(e.to_string()))?;

        let mut rng = self.request_rng(location, start);
        let observations = self.generate(&mut rng, &dates);

        debug!(
            days = observations.len(),
            seeded = self.seed.is_some(),
            "Generated synthetic temperatures"
        );
        Ok(observations)
    }

    fn temperature_unit(&self) -> TemperatureUnit {
        self.unit
    }

    async fn is_available(&self) -> bool {
        true
    }
}
