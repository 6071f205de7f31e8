//! Season accumulation pipeline
//!
//! Resolves the season window for a year, fetches the whole window from the
//! weather source in a single call and folds the observations into a daily
//! growing-degree-day series. A computation either succeeds completely or
//! fails; no partial series is ever returned.

use std::sync::Arc;

use domain::{
    GddAccumulator, SeasonResult, SeasonWindow, Vineyard, VineyardId, verify_coverage,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{VineyardRepository, WeatherSourcePort},
};

/// Computes growing degree day series for vineyard sites
pub struct GddService {
    repository: Arc<dyn VineyardRepository>,
    weather: Arc<dyn WeatherSourcePort>,
    window: SeasonWindow,
}

impl std::fmt::Debug for GddService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GddService")
            .field("window", &self.window)
            .field("weather_unit", &self.weather.temperature_unit())
            .finish_non_exhaustive()
    }
}

impl GddService {
    /// Create a service using the default March 1 to November 30 season
    #[must_use]
    pub fn new(
        repository: Arc<dyn VineyardRepository>,
        weather: Arc<dyn WeatherSourcePort>,
    ) -> Self {
        Self {
            repository,
            weather,
            window: SeasonWindow::default(),
        }
    }

    /// Use a custom season window
    #[must_use]
    pub const fn with_window(mut self, window: SeasonWindow) -> Self {
        self.window = window;
        self
    }

    /// The configured season window
    #[must_use]
    pub const fn window(&self) -> SeasonWindow {
        self.window
    }

    /// Compute the season series for a stored vineyard
    ///
    /// # Errors
    ///
    /// `NotFound` when no vineyard has this ID; otherwise as
    /// [`compute_season_gdd`](Self::compute_season_gdd).
    #[instrument(skip(self), fields(vineyard_id = %id))]
    pub async fn compute_season_gdd_by_id(
        &self,
        id: &VineyardId,
        year: i32,
    ) -> Result<SeasonResult, ApplicationError> {
        let vineyard = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::vineyard_not_found(id))?;

        self.compute_season_gdd(&vineyard, year).await
    }

    /// Compute the season series for a vineyard
    ///
    /// # Errors
    ///
    /// - `Domain(ValidationError)` if the window does not exist in `year`
    /// - `UpstreamWeather` if the weather source fails or returns anything
    ///   other than one finite observation per day of the window
    #[instrument(skip(self, vineyard), fields(vineyard_id = %vineyard.id(), base_temp = vineyard.gdd_base_temp()))]
    pub async fn compute_season_gdd(
        &self,
        vineyard: &Vineyard,
        year: i32,
    ) -> Result<SeasonResult, ApplicationError> {
        let dates = self.window.resolve(year)?;
        let location = vineyard.location().coordinates();

        debug!(
            start = %dates.start(),
            end = %dates.end(),
            days = dates.day_count(),
            "Requesting season weather"
        );

        let observations = self
            .weather
            .get_historical_weather(&location, dates.start(), dates.end())
            .await
            .map_err(|e| match e {
                ApplicationError::UpstreamWeather(_) => e,
                other => ApplicationError::upstream(other.to_string()),
            })?;

        verify_coverage(&observations, &dates).map_err(|e| {
            warn!(error = %e, "Weather source broke the daily observation contract");
            ApplicationError::upstream(e.to_string())
        })?;

        let inverted = observations.iter().filter(|o| o.is_inverted()).count();
        if inverted > 0 {
            warn!(
                inverted_days = inverted,
                "Weather source reported max below min, averaging as reported"
            );
        }

        let mut accumulator =
            GddAccumulator::with_capacity(vineyard.gdd_base_temp(), observations.len());
        accumulator.extend(&observations);
        let (records, total_gdd) = accumulator.finish();

        info!(days = records.len(), total_gdd, "Season GDD computed");

        Ok(SeasonResult {
            vineyard: vineyard.summary(),
            records,
            total_gdd,
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use domain::{DailyObservation, SiteLocation};

    use super::*;
    use crate::ports::{MockVineyardRepository, MockWeatherSourcePort};

    fn vineyard() -> Vineyard {
        let location = SiteLocation::new(38.5, -122.4, Some("Napa".to_string())).unwrap();
        Vineyard::new("Test Block", location, None).unwrap()
    }

    fn constant_weather(max: f64, min: f64) -> MockWeatherSourcePort {
        let mut weather = MockWeatherSourcePort::new();
        weather
            .expect_get_historical_weather()
            .times(1)
            .returning(move |_, start, end| {
                Ok(start
                    .iter_days()
                    .take_while(|d| *d <= end)
                    .map(|d| DailyObservation::new(d, max, min))
                    .collect())
            });
        weather.expect_temperature_unit().return_const(domain::TemperatureUnit::Fahrenheit);
        weather
    }

    fn service(weather: MockWeatherSourcePort) -> GddService {
        GddService::new(Arc::new(MockVineyardRepository::new()), Arc::new(weather))
    }

    #[tokio::test]
    async fn constant_thirty_days() {
        let window = SeasonWindow::parse("03-01", "03-30").unwrap();
        let service = service(constant_weather(70.0, 50.0)).with_window(window);

        let result = service.compute_season_gdd(&vineyard(), 2024).await.unwrap();

        assert_eq!(result.records.len(), 30);
        assert!((result.total_gdd - 300.0).abs() < 1e-9);
        assert_eq!(result.year, 2024);
        assert_eq!(result.vineyard.name, "Test Block");
        let cumulative: Vec<i64> = result.records.iter().map(|r| r.cumulative_gdd).collect();
        let expected: Vec<i64> = (1..=30).map(|i| i * 10).collect();
        assert_eq!(cumulative, expected);
        assert!(result.records.iter().all(|r| (r.daily_gdd - 10.0).abs() < 1e-9));
    }

    #[tokio::test]
    async fn default_window_covers_march_through_november() {
        let service = service(constant_weather(60.0, 50.0));

        let result = service.compute_season_gdd(&vineyard(), 2023).await.unwrap();

        assert_eq!(result.records.len(), 275);
        assert_eq!(result.records[0].date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(result.records[0].date_label, "Mar 1");
        assert_eq!(
            result.final_cumulative(),
            Some(1375),
            "275 days of 5 heat units"
        );
    }

    #[tokio::test]
    async fn cold_season_totals_zero() {
        let service = service(constant_weather(40.0, 30.0));
        let result = service.compute_season_gdd(&vineyard(), 2024).await.unwrap();
        assert!(result.total_gdd.abs() < f64::EPSILON);
        assert!(result.records.iter().all(|r| r.cumulative_gdd == 0));
    }

    #[tokio::test]
    async fn unknown_vineyard_is_not_found() {
        let mut repository = MockVineyardRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        let mut weather = MockWeatherSourcePort::new();
        weather.expect_get_historical_weather().never();

        let service = GddService::new(Arc::new(repository), Arc::new(weather));
        let err = service
            .compute_season_gdd_by_id(&VineyardId::new(), 2024)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn stored_vineyard_base_temp_is_used() {
        let location = SiteLocation::new(45.0, 7.0, None).unwrap();
        let stored = Vineyard::new("Cool Site", location, Some(55.0)).unwrap();
        let id = stored.id();
        let mut repository = MockVineyardRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let window = SeasonWindow::parse("07-01", "07-10").unwrap();
        let service = GddService::new(Arc::new(repository), Arc::new(constant_weather(70.0, 50.0)))
            .with_window(window);
        let result = service.compute_season_gdd_by_id(&id, 2024).await.unwrap();

        assert!((result.total_gdd - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn weather_failure_is_upstream_error() {
        let mut weather = MockWeatherSourcePort::new();
        weather
            .expect_get_historical_weather()
            .times(1)
            .returning(|_, _, _| Err(ApplicationError::Internal("socket closed".into())));

        let err = service(weather)
            .compute_season_gdd(&vineyard(), 2024)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::UpstreamWeather(ref m) if m.contains("socket closed")));
    }

    #[tokio::test]
    async fn gap_in_observations_is_rejected() {
        let mut weather = MockWeatherSourcePort::new();
        weather
            .expect_get_historical_weather()
            .returning(|_, start, end| {
                Ok(start
                    .iter_days()
                    .take_while(|d| *d <= end)
                    .filter(|d| *d != NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
                    .map(|d| DailyObservation::new(d, 70.0, 50.0))
                    .collect())
            });

        let window = SeasonWindow::parse("03-01", "03-10").unwrap();
        let err = service(weather)
            .with_window(window)
            .compute_season_gdd(&vineyard(), 2024)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::UpstreamWeather(_)));
    }

    #[tokio::test]
    async fn nan_observation_is_rejected() {
        let mut weather = MockWeatherSourcePort::new();
        weather
            .expect_get_historical_weather()
            .returning(|_, start, _| Ok(vec![DailyObservation::new(start, f64::NAN, 50.0)]));

        let window = SeasonWindow::parse("03-01", "03-01").unwrap();
        let err = service(weather)
            .with_window(window)
            .compute_season_gdd(&vineyard(), 2024)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::UpstreamWeather(_)));
    }

    #[tokio::test]
    async fn inverted_extremes_are_tolerated() {
        let window = SeasonWindow::parse("03-01", "03-02").unwrap();
        let service = service(constant_weather(50.0, 70.0)).with_window(window);
        let result = service.compute_season_gdd(&vineyard(), 2024).await.unwrap();
        assert!((result.total_gdd - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn window_missing_in_year_is_validation_error() {
        let mut weather = MockWeatherSourcePort::new();
        weather.expect_get_historical_weather().never();
        let window = SeasonWindow::parse("02-29", "03-31").unwrap();

        let err = service(weather)
            .with_window(window)
            .compute_season_gdd(&vineyard(), 2023)
            .await
            .unwrap_err();

        assert!(err.is_client_error());
    }
}
