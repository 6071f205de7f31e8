//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod database_health_port;
mod vineyard_repository;
mod weather_source_port;

#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use vineyard_repository::MockVineyardRepository;
pub use vineyard_repository::VineyardRepository;
#[cfg(test)]
pub use weather_source_port::MockWeatherSourcePort;
pub use weather_source_port::WeatherSourcePort;
