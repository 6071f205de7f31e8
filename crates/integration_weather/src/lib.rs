//! Open-Meteo historical weather integration
//!
//! Client for the Open-Meteo Historical Weather API
//! (<https://open-meteo.com/en/docs/historical-weather-api>). Provides daily
//! maximum and minimum temperatures for arbitrary past date ranges.

pub mod client;
mod models;

pub use client::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::DailyTemperature;
