//! Weather source configuration.

use std::fmt;

use domain::TemperatureUnit;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Which weather source feeds the GDD pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherProvider {
    /// Offline seasonal model, usable without network access
    #[default]
    Synthetic,
    /// Open-Meteo historical archive
    OpenMeteo,
}

impl fmt::Display for WeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synthetic => write!(f, "synthetic"),
            Self::OpenMeteo => write!(f, "open_meteo"),
        }
    }
}

/// Weather source configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    #[serde(default)]
    pub provider: WeatherProvider,

    /// Open-Meteo archive base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Unit of every temperature, including site base temperatures
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Commercial Open-Meteo API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Fixed seed for the synthetic model; random when unset
    #[serde(default)]
    pub synthetic_seed: Option<u64>,
}

fn default_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            provider: WeatherProvider::default(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            temperature_unit: TemperatureUnit::default(),
            api_key: None,
            synthetic_seed: None,
        }
    }
}

impl fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature_unit", &self.temperature_unit)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("synthetic_seed", &self.synthetic_seed)
            .finish()
    }
}

impl WeatherAppConfig {
    /// Client configuration for the Open-Meteo integration
    #[must_use]
    pub fn to_client_config(&self) -> integration_weather::WeatherConfig {
        integration_weather::WeatherConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            temperature_unit: self.temperature_unit,
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string())
                .filter(|key| !key.is_empty()),
        }
    }
}

/// Growing season bounds as `MM-DD` strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonConfig {
    #[serde(default = "default_season_start")]
    pub start: String,

    #[serde(default = "default_season_end")]
    pub end: String,
}

fn default_season_start() -> String {
    "03-01".to_string()
}

fn default_season_end() -> String {
    "11-30".to_string()
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            start: default_season_start(),
            end: default_season_end(),
        }
    }
}

impl SeasonConfig {
    /// Parse into a validated season window
    pub fn window(&self) -> Result<domain::SeasonWindow, domain::DomainError> {
        domain::SeasonWindow::parse(&self.start, &self.end)
    }
}
