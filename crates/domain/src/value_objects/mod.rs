//! Value objects - immutable types defined by their attributes

mod geo_location;
mod temperature_unit;
mod vineyard_id;

pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use temperature_unit::TemperatureUnit;
pub use vineyard_id::VineyardId;
