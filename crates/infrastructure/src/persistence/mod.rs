//! Persistence layer - SQLite storage via sqlx

mod async_connection;
mod database_health;
mod error;
mod vineyard_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use error::map_sqlx_error;
pub use vineyard_store::SqliteVineyardStore;
