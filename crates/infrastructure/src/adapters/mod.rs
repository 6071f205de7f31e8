//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod open_meteo_adapter;
mod synthetic_weather_adapter;

use std::sync::Arc;

use application::{error::ApplicationError, ports::WeatherSourcePort};
pub use open_meteo_adapter::OpenMeteoWeatherAdapter;
pub use synthetic_weather_adapter::SyntheticWeatherAdapter;
use tracing::info;

use crate::config::{WeatherAppConfig, WeatherProvider};

/// Build the weather source selected by configuration
///
/// # Errors
///
/// Returns a configuration error if the Open-Meteo HTTP client cannot be
/// initialized.
pub fn build_weather_source(
    config: &WeatherAppConfig,
) -> Result<Arc<dyn WeatherSourcePort>, ApplicationError> {
    let source: Arc<dyn WeatherSourcePort> = match config.provider {
        WeatherProvider::Synthetic => {
            let mut adapter = SyntheticWeatherAdapter::new().with_unit(config.temperature_unit);
            if let Some(seed) = config.synthetic_seed {
                adapter = adapter.with_seed(seed);
            }
            Arc::new(adapter)
        },
        WeatherProvider::OpenMeteo => {
            Arc::new(OpenMeteoWeatherAdapter::new(config.to_client_config())?)
        },
    };

    info!(
        provider = %config.provider,
        unit = %config.temperature_unit,
        "Weather source initialized"
    );
    Ok(source)
}
