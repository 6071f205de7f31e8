//! Integration tests for the Open-Meteo weather source using wiremock

use application::{error::ApplicationError, ports::WeatherSourcePort};
use chrono::NaiveDate;
use domain::GeoLocation;
use infrastructure::{OpenMeteoWeatherAdapter, WeatherAppConfig, WeatherProvider, build_weather_source};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn test_config(mock_server: &MockServer) -> WeatherAppConfig {
    WeatherAppConfig {
        provider: WeatherProvider::OpenMeteo,
        base_url: mock_server.uri(),
        timeout_secs: 5,
        ..WeatherAppConfig::default()
    }
}

fn create_test_adapter(mock_server: &MockServer) -> OpenMeteoWeatherAdapter {
    OpenMeteoWeatherAdapter::new(test_config(mock_server).to_client_config())
        .expect("Failed to create adapter")
}

fn location() -> GeoLocation {
    GeoLocation::new(38.5, -122.4).unwrap()
}

#[tokio::test]
async fn archive_rows_become_observations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("start_date", "2024-03-01"))
        .and(query_param("end_date", "2024-03-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 38.5,
            "longitude": -122.375,
            "daily": {
                "time": ["2024-03-01", "2024-03-02"],
                "temperature_2m_max": [70.0, 64.0],
                "temperature_2m_min": [50.0, 44.0]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = create_test_adapter(&mock_server);
    let obs = adapter
        .get_historical_weather(&location(), date(3, 1), date(3, 2))
        .await
        .expect("request should succeed");

    assert_eq!(obs.len(), 2);
    assert_eq!(obs[1].date(), date(3, 2));
    assert!((obs[0].max_temp() - 70.0).abs() < f64::EPSILON);
    assert!((obs[1].min_temp() - 44.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn server_error_is_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let adapter = create_test_adapter(&mock_server);
    let err = adapter
        .get_historical_weather(&location(), date(3, 1), date(3, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::UpstreamWeather(_)));
}

#[tokio::test]
async fn missing_day_is_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 38.5,
            "longitude": -122.375,
            "daily": {
                "time": ["2024-03-01"],
                "temperature_2m_max": [null],
                "temperature_2m_min": [41.0]
            }
        })))
        .mount(&mock_server)
        .await;

    let adapter = create_test_adapter(&mock_server);
    let err = adapter
        .get_historical_weather(&location(), date(3, 1), date(3, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::UpstreamWeather(_)));
}

#[tokio::test]
async fn factory_wires_configured_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = build_weather_source(&test_config(&mock_server)).expect("factory");
    assert!(!source.is_available().await);
}
