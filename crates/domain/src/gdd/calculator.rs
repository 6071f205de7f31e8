//! Daily heat unit calculation (simple averaging method)

/// Conventional base temperature for Vitis vinifera, in Fahrenheit
pub const DEFAULT_BASE_TEMP: f64 = 50.0;

/// Heat units accumulated on a single day
///
/// Averages the daily extremes and subtracts the base temperature, clamping
/// at zero. The result is only meaningful for finite inputs.
///
/// # Examples
///
/// ```
/// use domain::calculate_gdd;
///
/// assert!((calculate_gdd(70.0, 50.0, 50.0) - 10.0).abs() < f64::EPSILON);
/// assert!(calculate_gdd(40.0, 30.0, 50.0).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn calculate_gdd(max_temp: f64, min_temp: f64, base_temp: f64) -> f64 {
    let average = (max_temp + min_temp) / 2.0;
    (average - base_temp).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_day_accumulates() {
        assert!((calculate_gdd(70.0, 50.0, 50.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cold_day_clamps_to_zero() {
        assert!(calculate_gdd(40.0, 30.0, 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_equal_to_base_is_zero() {
        assert!(calculate_gdd(60.0, 40.0, 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fractional_average() {
        assert!((calculate_gdd(71.0, 50.0, 50.0) - 10.5).abs() < f64::EPSILON);
    }

    #[test]
    fn inverted_extremes_give_same_result() {
        assert!(
            (calculate_gdd(50.0, 70.0, 50.0) - calculate_gdd(70.0, 50.0, 50.0)).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn celsius_base() {
        assert!((calculate_gdd(25.0, 15.0, 10.0) - 10.0).abs() < f64::EPSILON);
    }
}
