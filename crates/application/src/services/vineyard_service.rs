//! Vineyard site use cases

use std::sync::Arc;

use domain::{SiteLocation, Vineyard, VineyardId};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::VineyardRepository};

/// Coordinates and optional address as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub struct LocationInput {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

impl LocationInput {
    fn into_site_location(self) -> Result<SiteLocation, ApplicationError> {
        Ok(SiteLocation::new(
            self.latitude,
            self.longitude,
            self.address,
        )?)
    }
}

/// Data required to register a vineyard
#[derive(Debug, Clone, PartialEq)]
pub struct NewVineyard {
    pub name: String,
    pub location: LocationInput,
    /// Falls back to the default base temperature when absent
    pub gdd_base_temp: Option<f64>,
}

/// Partial update of a vineyard; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VineyardUpdate {
    pub name: Option<String>,
    pub location: Option<LocationInput>,
    pub gdd_base_temp: Option<f64>,
}

impl VineyardUpdate {
    /// Whether the update would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.gdd_base_temp.is_none()
    }
}

/// CRUD operations over vineyard sites
pub struct VineyardService {
    repository: Arc<dyn VineyardRepository>,
}

impl std::fmt::Debug for VineyardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VineyardService").finish_non_exhaustive()
    }
}

impl VineyardService {
    #[must_use]
    pub fn new(repository: Arc<dyn VineyardRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a new vineyard
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewVineyard) -> Result<Vineyard, ApplicationError> {
        let location = input.location.into_site_location()?;
        let vineyard = Vineyard::new(&input.name, location, input.gdd_base_temp)?;

        self.repository.insert(&vineyard).await?;
        info!(vineyard_id = %vineyard.id(), "Vineyard created");

        Ok(vineyard)
    }

    /// All vineyards, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Vineyard>, ApplicationError> {
        let vineyards = self.repository.list().await?;
        debug!(count = vineyards.len(), "Listed vineyards");
        Ok(vineyards)
    }

    /// Get a vineyard, failing with `NotFound` when absent
    #[instrument(skip(self), fields(vineyard_id = %id))]
    pub async fn get(&self, id: &VineyardId) -> Result<Vineyard, ApplicationError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::vineyard_not_found(id))
    }

    /// Apply a partial update
    #[instrument(skip(self, update), fields(vineyard_id = %id))]
    pub async fn update(
        &self,
        id: &VineyardId,
        update: VineyardUpdate,
    ) -> Result<Vineyard, ApplicationError> {
        let mut vineyard = self.get(id).await?;
        if update.is_empty() {
            return Ok(vineyard);
        }

        if let Some(name) = update.name {
            vineyard.rename(name)?;
        }
        if let Some(location) = update.location {
            vineyard.relocate(location.into_site_location()?);
        }
        if let Some(base) = update.gdd_base_temp {
            vineyard.set_gdd_base_temp(base)?;
        }

        if !self.repository.update(&vineyard).await? {
            return Err(ApplicationError::vineyard_not_found(id));
        }
        info!("Vineyard updated");

        Ok(vineyard)
    }

    /// Delete a vineyard, failing with `NotFound` when absent
    #[instrument(skip(self), fields(vineyard_id = %id))]
    pub async fn delete(&self, id: &VineyardId) -> Result<(), ApplicationError> {
        if self.repository.delete(id).await? {
            info!("Vineyard deleted");
            Ok(())
        } else {
            Err(ApplicationError::vineyard_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::DomainError;

    use super::*;
    use crate::ports::MockVineyardRepository;

    fn input(name: &str) -> NewVineyard {
        NewVineyard {
            name: name.to_string(),
            location: LocationInput {
                latitude: 44.84,
                longitude: -0.58,
                address: Some("Bordeaux".to_string()),
            },
            gdd_base_temp: None,
        }
    }

    fn stored() -> Vineyard {
        let location = SiteLocation::new(44.84, -0.58, None).unwrap();
        Vineyard::new("Stored", location, None).unwrap()
    }

    #[tokio::test]
    async fn create_inserts_validated_vineyard() {
        let mut repository = MockVineyardRepository::new();
        repository
            .expect_insert()
            .withf(|v| v.name() == "Château Test")
            .times(1)
            .returning(|_| Ok(()));

        let service = VineyardService::new(Arc::new(repository));
        let vineyard = service.create(input("Château Test")).await.unwrap();

        assert!((vineyard.gdd_base_temp() - 50.0).abs() < f64::EPSILON);
        assert_eq!(vineyard.location().address(), Some("Bordeaux"));
    }

    #[tokio::test]
    async fn create_rejects_missing_name_without_touching_storage() {
        let mut repository = MockVineyardRepository::new();
        repository.expect_insert().never();

        let service = VineyardService::new(Arc::new(repository));
        let err = service.create(input("")).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn create_rejects_bad_coordinates() {
        let mut repository = MockVineyardRepository::new();
        repository.expect_insert().never();
        let mut bad = input("Site");
        bad.location.latitude = 120.0;

        let service = VineyardService::new(Arc::new(repository));
        assert!(service.create(bad).await.unwrap_err().is_client_error());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let mut repository = MockVineyardRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = VineyardService::new(Arc::new(repository));
        let err = service.get(&VineyardId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_applies_changes() {
        let existing = stored();
        let id = existing.id();
        let mut repository = MockVineyardRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|v| v.name() == "Renamed" && (v.gdd_base_temp() - 48.0).abs() < 1e-9)
            .times(1)
            .returning(|_| Ok(true));

        let service = VineyardService::new(Arc::new(repository));
        let update = VineyardUpdate {
            name: Some("Renamed".to_string()),
            gdd_base_temp: Some(48.0),
            ..VineyardUpdate::default()
        };
        let updated = service.update(&id, update).await.unwrap();
        assert_eq!(updated.name(), "Renamed");
    }

    #[tokio::test]
    async fn empty_update_skips_storage() {
        let existing = stored();
        let id = existing.id();
        let mut repository = MockVineyardRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_update().never();

        let service = VineyardService::new(Arc::new(repository));
        let unchanged = service.update(&id, VineyardUpdate::default()).await.unwrap();
        assert_eq!(unchanged.name(), "Stored");
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let mut repository = MockVineyardRepository::new();
        repository.expect_delete().returning(|_| Ok(false));

        let service = VineyardService::new(Arc::new(repository));
        assert!(service.delete(&VineyardId::new()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_passes_through() {
        let mut repository = MockVineyardRepository::new();
        repository.expect_list().returning(|| Ok(vec![stored(), stored()]));

        let service = VineyardService::new(Arc::new(repository));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
