//! Application services - Use case implementations

mod gdd_service;
mod health_service;
mod vineyard_service;

pub use gdd_service::GddService;
pub use health_service::{HealthConfig, HealthReport, HealthService, ServiceHealth};
pub use vineyard_service::{LocationInput, NewVineyard, VineyardService, VineyardUpdate};
