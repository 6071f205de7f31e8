//! Vineyard repository port
//!
//! Defines the interface for persisting vineyard sites.

use async_trait::async_trait;
use domain::{Vineyard, VineyardId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for vineyard persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VineyardRepository: Send + Sync {
    /// Store a new vineyard
    async fn insert(&self, vineyard: &Vineyard) -> Result<(), ApplicationError>;

    /// Get a vineyard by ID, `None` if it does not exist
    async fn find_by_id(&self, id: &VineyardId) -> Result<Option<Vineyard>, ApplicationError>;

    /// List all vineyards, newest first
    async fn list(&self) -> Result<Vec<Vineyard>, ApplicationError>;

    /// Replace a stored vineyard
    ///
    /// # Returns
    /// true if a row was updated, false if the vineyard didn't exist
    async fn update(&self, vineyard: &Vineyard) -> Result<bool, ApplicationError>;

    /// Delete a vineyard
    ///
    /// # Returns
    /// true if the vineyard was deleted, false if it didn't exist
    async fn delete(&self, id: &VineyardId) -> Result<bool, ApplicationError>;
}
