//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the SQLite store, weather sources, configuration and telemetry.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::{OpenMeteoWeatherAdapter, SyntheticWeatherAdapter, build_weather_source};
pub use config::{
    AppConfig, DatabaseConfig, Environment, SeasonConfig, ServerConfig, TelemetryAppConfig,
    WeatherAppConfig, WeatherProvider,
};
pub use persistence::{AsyncDatabase, AsyncDatabaseConfig, SqliteDatabaseHealth, SqliteVineyardStore};
pub use telemetry::{TelemetryConfig, TelemetryGuard, init_telemetry};
