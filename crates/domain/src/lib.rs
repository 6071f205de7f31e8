//! Domain layer for Vigneron
//!
//! Contains the vineyard site entity, the growing-degree-day calculator and
//! the season accumulation rules. This layer performs no I/O and defines the
//! ubiquitous language shared by every other crate.

pub mod entities;
pub mod errors;
pub mod gdd;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use gdd::{
    DEFAULT_BASE_TEMP, DailyGddRecord, DailyObservation, GddAccumulator, MonthDay, SeasonDates,
    SeasonResult, SeasonWindow, calculate_gdd, verify_coverage,
};
pub use value_objects::*;
