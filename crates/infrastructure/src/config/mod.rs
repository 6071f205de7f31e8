//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `weather`: Weather source and growing season settings
//! - `telemetry`: Log filter and OpenTelemetry export
//!
//! Sources are layered: built-in defaults, then `config.toml` (or the file
//! named by `VIGNERON_CONFIG`), then `VIGNERON_*` environment variables with
//! `__` separating nested keys (e.g. `VIGNERON_SERVER__PORT=8080`).

mod database;
mod server;
mod telemetry;
mod weather;

use application::HealthConfig;
use domain::SeasonWindow;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryAppConfig;
pub use weather::{SeasonConfig, WeatherAppConfig, WeatherProvider};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "VIGNERON_CONFIG";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Production hides internal error details from HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub weather: WeatherAppConfig,

    #[serde(default)]
    pub season: SeasonConfig,

    /// Readiness probe timeouts
    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from the default locations and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref())
    }

    /// Load configuration, reading `path` instead of `./config.toml` when given
    ///
    /// An explicit path must exist; the implicit `config.toml` is optional.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::with_name(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("VIGNERON")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.season_window()
            .map_err(|e| config::ConfigError::Message(format!("season: {e}")))?;

        if let Some(ratio) = self.telemetry.sample_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(config::ConfigError::Message(format!(
                    "telemetry.sample_ratio must be within 0.0..=1.0, got {ratio}"
                )));
            }
        }

        if self.database.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.weather.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "weather.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured growing season
    pub fn season_window(&self) -> Result<SeasonWindow, domain::DomainError> {
        self.season.window()
    }

    /// Whether internal error details may appear in responses
    #[must_use]
    pub fn expose_internal_errors(&self) -> bool {
        self.environment != Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::TemperatureUnit;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn environment_from_str() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(
            "DEVELOPMENT".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn defaults_match_original_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
        assert_eq!(config.weather.provider, WeatherProvider::Synthetic);
        assert_eq!(config.weather.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(config.season_window().unwrap(), SeasonWindow::default());
        assert!(config.expose_internal_errors());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
environment = "production"

[server]
port = 8080
log_format = "json"

[weather]
provider = "open_meteo"
temperature_unit = "celsius"
api_key = "abc123"

[season]
start = "04-01"
end = "10-31"

[health]
global_timeout_secs = 2
"#,
        );

        let config = AppConfig::load_from(file.path().to_str()).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 8080);
        assert!(config.server.json_logs());
        assert_eq!(config.weather.provider, WeatherProvider::OpenMeteo);
        assert_eq!(config.weather.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(
            config.weather.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("abc123".to_string())
        );
        assert_eq!(config.season_window().unwrap().start().to_string(), "04-01");
        assert_eq!(config.health.global_timeout_secs, 2);
        assert!(!config.expose_internal_errors());
    }

    #[test]
    fn invalid_season_rejected_at_load() {
        let file = write_config("[season]\nstart = \"11-30\"\nend = \"03-01\"\n");
        assert!(AppConfig::load_from(file.path().to_str()).is_err());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        assert!(AppConfig::load_from(Some("/nonexistent/vigneron-config.toml")).is_err());
    }

    #[test]
    fn sample_ratio_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.telemetry.sample_ratio = Some(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn weather_debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.weather.api_key = Some("secret-key".to_string().into());
        assert!(!format!("{config:?}").contains("secret-key"));
    }

    #[test]
    fn client_config_drops_empty_key() {
        let mut weather = WeatherAppConfig::default();
        weather.api_key = Some(String::new().into());
        assert!(weather.to_client_config().api_key.is_none());
    }

    #[test]
    fn serialized_config_omits_api_key() {
        let mut config = AppConfig::default();
        config.weather.api_key = Some("secret-key".to_string().into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(json.contains("\"provider\":\"synthetic\""));
    }
}
