//! Running accumulation of heat units over an observation sequence

use crate::{
    errors::DomainError,
    gdd::{DailyGddRecord, DailyObservation, SeasonDates, calculate_gdd},
};

/// Check that observations cover a date range exactly once per day
///
/// The sequence must be ascending with no gaps and no duplicates, and every
/// temperature must be finite.
///
/// # Errors
///
/// Returns `InvalidObservation` describing the first violation found.
pub fn verify_coverage(
    observations: &[DailyObservation],
    dates: &SeasonDates,
) -> Result<(), DomainError> {
    let expected = dates.day_count();
    if observations.len() != expected {
        return Err(DomainError::invalid_observation(format!(
            "expected {expected} daily observations for {}..={}, got {}",
            dates.start(),
            dates.end(),
            observations.len()
        )));
    }

    for (observation, day) in observations.iter().zip(dates.days()) {
        if observation.date() != day {
            return Err(DomainError::invalid_observation(format!(
                "expected observation for {day}, found {}",
                observation.date()
            )));
        }
        observation.ensure_finite()?;
    }

    Ok(())
}

/// Accumulates daily heat units in observation order
///
/// Holds the single piece of pipeline state: the full-precision running sum.
#[derive(Debug, Clone)]
pub struct GddAccumulator {
    base_temp: f64,
    cumulative: f64,
    records: Vec<DailyGddRecord>,
}

impl GddAccumulator {
    #[must_use]
    pub const fn new(base_temp: f64) -> Self {
        Self {
            base_temp,
            cumulative: 0.0,
            records: Vec::new(),
        }
    }

    /// Pre-allocate room for a known number of days
    #[must_use]
    pub fn with_capacity(base_temp: f64, days: usize) -> Self {
        Self {
            base_temp,
            cumulative: 0.0,
            records: Vec::with_capacity(days),
        }
    }

    /// Add one day and return the record emitted for it
    pub fn push(&mut self, observation: &DailyObservation) -> &DailyGddRecord {
        let daily = calculate_gdd(
            observation.max_temp(),
            observation.min_temp(),
            self.base_temp,
        );
        self.cumulative += daily;
        let index = self.records.len();
        self.records.push(DailyGddRecord::from_observation(
            observation,
            daily,
            self.cumulative,
        ));
        &self.records[index]
    }

    /// Unrounded heat units accumulated so far
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.cumulative
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the accumulator, yielding the records and the unrounded total
    #[must_use]
    pub fn finish(self) -> (Vec<DailyGddRecord>, f64) {
        (self.records, self.cumulative)
    }
}

impl<'a> Extend<&'a DailyObservation> for GddAccumulator {
    fn extend<I: IntoIterator<Item = &'a DailyObservation>>(&mut self, iter: I) {
        for observation in iter {
            self.push(observation);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dates(days: u32) -> SeasonDates {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, days).unwrap();
        SeasonDates::new(start, end).unwrap()
    }

    fn constant(range: &SeasonDates, max: f64, min: f64) -> Vec<DailyObservation> {
        range
            .days()
            .map(|d| DailyObservation::new(d, max, min))
            .collect()
    }

    #[test]
    fn constant_month_accumulates_linearly() {
        let range = dates(30);
        let observations = constant(&range, 70.0, 50.0);
        let mut acc = GddAccumulator::with_capacity(50.0, range.day_count());
        acc.extend(&observations);
        let (records, total) = acc.finish();

        assert_eq!(records.len(), 30);
        assert!((total - 300.0).abs() < 1e-9);
        for (i, record) in records.iter().enumerate() {
            assert!((record.daily_gdd - 10.0).abs() < 1e-9);
            assert_eq!(record.cumulative_gdd, 10 * (i as i64 + 1));
        }
    }

    #[test]
    fn cold_days_do_not_subtract() {
        let mut acc = GddAccumulator::new(50.0);
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        acc.push(&DailyObservation::new(d1, 70.0, 50.0));
        let record = acc.push(&DailyObservation::new(d1.succ_opt().unwrap(), 30.0, 20.0));
        assert_eq!(record.cumulative_gdd, 10);
        assert!((acc.total() - 10.0).abs() < 1e-9);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn total_keeps_precision_while_records_round() {
        let range = dates(3);
        let observations = constant(&range, 50.7, 50.0);
        let mut acc = GddAccumulator::new(50.0);
        acc.extend(&observations);
        let (records, total) = acc.finish();
        assert!((total - 1.05).abs() < 1e-9);
        assert!((records[0].daily_gdd - 0.4).abs() < 1e-9);
        assert_eq!(records[2].cumulative_gdd, 1);
    }

    #[test]
    fn new_accumulator_is_empty() {
        let acc = GddAccumulator::new(50.0);
        assert!(acc.is_empty());
        assert!(acc.total().abs() < f64::EPSILON);
    }

    #[test]
    fn coverage_accepts_exact_sequence() {
        let range = dates(10);
        assert!(verify_coverage(&constant(&range, 70.0, 50.0), &range).is_ok());
    }

    #[test]
    fn coverage_rejects_missing_day() {
        let range = dates(10);
        let mut observations = constant(&range, 70.0, 50.0);
        observations.remove(4);
        let err = verify_coverage(&observations, &range).unwrap_err();
        assert!(matches!(err, DomainError::InvalidObservation(_)));
    }

    #[test]
    fn coverage_rejects_gap_with_duplicate() {
        let range = dates(10);
        let mut observations = constant(&range, 70.0, 50.0);
        observations[5] = observations[4];
        assert!(verify_coverage(&observations, &range).is_err());
    }

    #[test]
    fn coverage_rejects_out_of_order() {
        let range = dates(10);
        let mut observations = constant(&range, 70.0, 50.0);
        observations.swap(2, 3);
        assert!(verify_coverage(&observations, &range).is_err());
    }

    #[test]
    fn coverage_rejects_nan() {
        let range = dates(3);
        let mut observations = constant(&range, 70.0, 50.0);
        observations[1] = DailyObservation::new(observations[1].date(), f64::NAN, 50.0);
        assert!(verify_coverage(&observations, &range).is_err());
    }
}
