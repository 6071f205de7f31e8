//! Derived per-day records and the season aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{entities::VineyardSummary, gdd::DailyObservation};

/// One day of a season's heat unit series
///
/// Rounding is applied for presentation only; the running sum that produced
/// `cumulative_gdd` is kept at full precision by the accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGddRecord {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Short label such as "Mar 1"
    pub date_label: String,
    /// Heat units for this day, rounded to one decimal
    pub daily_gdd: f64,
    /// Heat units accumulated since the season start, rounded to an integer
    pub cumulative_gdd: i64,
    pub max_temp: f64,
    pub min_temp: f64,
}

impl DailyGddRecord {
    /// Build a record from an observation and the unrounded heat unit values
    #[must_use]
    pub fn from_observation(observation: &DailyObservation, daily: f64, cumulative: f64) -> Self {
        let date = observation.date();
        Self {
            date,
            date_label: date.format("%b %-d").to_string(),
            daily_gdd: round_to_tenth(daily),
            cumulative_gdd: cumulative.round() as i64,
            max_temp: observation.max_temp(),
            min_temp: observation.min_temp(),
        }
    }
}

/// Heat unit series for one site and one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonResult {
    pub vineyard: VineyardSummary,
    pub records: Vec<DailyGddRecord>,
    /// Unrounded sum of every daily value
    pub total_gdd: f64,
    pub year: i32,
}

impl SeasonResult {
    /// Cumulative value of the final day, if the season has any days
    #[must_use]
    pub fn final_cumulative(&self) -> Option<i64> {
        self.records.last().map(|r| r.cumulative_gdd)
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
