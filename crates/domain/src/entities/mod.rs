//! Domain entities - objects with identity and lifecycle

mod vineyard;

pub use vineyard::{MAX_NAME_LENGTH, SiteLocation, Vineyard, VineyardSummary};
