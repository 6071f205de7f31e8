//! SQLite adapter for the VineyardRepository port

use application::{error::ApplicationError, ports::VineyardRepository};
use async_trait::async_trait;
use domain::{GeoLocation, SiteLocation, Vineyard, VineyardId};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{map_sqlx_error, parse_datetime};

/// SQLite implementation of the vineyard repository
#[derive(Debug, Clone)]
pub struct SqliteVineyardStore {
    pool: SqlitePool,
}

impl SqliteVineyardStore {
    /// Create a new store on an already migrated pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VineyardRepository for SqliteVineyardStore {
    #[instrument(skip(self, vineyard), fields(vineyard_id = %vineyard.id()))]
    async fn insert(&self, vineyard: &Vineyard) -> Result<(), ApplicationError> {
        let coordinates = vineyard.location().coordinates();
        sqlx::query(
            "INSERT INTO vineyards
             (id, name, latitude, longitude, address, gdd_base_temp, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(vineyard.id().to_string())
        .bind(vineyard.name())
        .bind(coordinates.latitude())
        .bind(coordinates.longitude())
        .bind(vineyard.location().address())
        .bind(vineyard.gdd_base_temp())
        .bind(vineyard.created_at().to_rfc3339())
        .bind(vineyard.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Vineyard stored");
        Ok(())
    }

    #[instrument(skip(self), fields(vineyard_id = %id))]
    async fn find_by_id(&self, id: &VineyardId) -> Result<Option<Vineyard>, ApplicationError> {
        let row: Option<VineyardRow> = sqlx::query_as(
            "SELECT id, name, latitude, longitude, address, gdd_base_temp, created_at, updated_at
             FROM vineyards WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(VineyardRow::to_vineyard).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Vineyard>, ApplicationError> {
        let rows: Vec<VineyardRow> = sqlx::query_as(
            "SELECT id, name, latitude, longitude, address, gdd_base_temp, created_at, updated_at
             FROM vineyards
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(VineyardRow::to_vineyard).collect()
    }

    #[instrument(skip(self, vineyard), fields(vineyard_id = %vineyard.id()))]
    async fn update(&self, vineyard: &Vineyard) -> Result<bool, ApplicationError> {
        let coordinates = vineyard.location().coordinates();
        let result = sqlx::query(
            "UPDATE vineyards
             SET name = $1, latitude = $2, longitude = $3, address = $4,
                 gdd_base_temp = $5, updated_at = $6
             WHERE id = $7",
        )
        .bind(vineyard.name())
        .bind(coordinates.latitude())
        .bind(coordinates.longitude())
        .bind(vineyard.location().address())
        .bind(vineyard.gdd_base_temp())
        .bind(vineyard.updated_at().to_rfc3339())
        .bind(vineyard.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(vineyard_id = %id))]
    async fn delete(&self, id: &VineyardId) -> Result<bool, ApplicationError> {
        let result = sqlx::query("DELETE FROM vineyards WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Row type for vineyard queries
#[derive(sqlx::FromRow)]
struct VineyardRow {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
    gdd_base_temp: f64,
    created_at: String,
    updated_at: String,
}

impl VineyardRow {
    fn to_vineyard(self) -> Result<Vineyard, ApplicationError> {
        let id = VineyardId::parse(&self.id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid vineyard id: {e}")))?;
        let coordinates = GeoLocation::new(self.latitude, self.longitude)
            .map_err(|e| ApplicationError::Internal(format!("Invalid stored coordinates: {e}")))?;

        Ok(Vineyard::restore(
            id,
            self.name,
            SiteLocation::from_coordinates(coordinates, self.address),
            self.gdd_base_temp,
            parse_datetime(&self.created_at)?,
            parse_datetime(&self.updated_at)?,
        ))
    }
}
