//! Temperature unit used by weather observations and base temperatures

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Unit of every temperature flowing through the GDD pipeline
///
/// A site's base temperature is interpreted in the same unit as the
/// observations returned by the configured weather source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Degrees Fahrenheit
    #[default]
    Fahrenheit,
    /// Degrees Celsius
    Celsius,
}

impl TemperatureUnit {
    /// Lowercase name, as used by query parameters and configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fahrenheit => "fahrenheit",
            Self::Celsius => "celsius",
        }
    }

    /// Conventional grapevine base temperature in this unit
    #[must_use]
    pub const fn default_base_temp(self) -> f64 {
        match self {
            Self::Fahrenheit => 50.0,
            Self::Celsius => 10.0,
        }
    }

    /// Convert a Fahrenheit reading into this unit
    #[must_use]
    pub fn from_fahrenheit(self, value: f64) -> f64 {
        match self {
            Self::Fahrenheit => value,
            Self::Celsius => (value - 32.0) * 5.0 / 9.0,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fahrenheit" | "f" => Ok(Self::Fahrenheit),
            "celsius" | "c" => Ok(Self::Celsius),
            other => Err(DomainError::validation(format!(
                "unknown temperature unit '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fahrenheit() {
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn parses_long_and_short_names() {
        assert_eq!("Celsius".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("f".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn converts_from_fahrenheit() {
        assert!((TemperatureUnit::Celsius.from_fahrenheit(50.0) - 10.0).abs() < 1e-9);
        assert!((TemperatureUnit::Fahrenheit.from_fahrenheit(50.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn default_base_matches_unit() {
        let base_f = TemperatureUnit::Fahrenheit.default_base_temp();
        let base_c = TemperatureUnit::Celsius.default_base_temp();
        assert!((TemperatureUnit::Celsius.from_fahrenheit(base_f) - base_c).abs() < 1e-9);
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&TemperatureUnit::Celsius).unwrap();
        assert_eq!(json, "\"celsius\"");
    }
}
