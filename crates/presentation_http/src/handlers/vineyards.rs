//! Vineyard handlers
//!
//! CRUD endpoints for vineyard sites and the per-season GDD series.

use application::{LocationInput, NewVineyard, VineyardUpdate};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use domain::{DailyGddRecord, SeasonResult, SiteLocation, Vineyard, VineyardId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Site coordinates and optional postal address
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"latitude": 38.5025, "longitude": -122.2654, "address": "Napa, CA"}))]
pub struct LocationDto {
    /// Decimal degrees, -90 to 90
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    /// Decimal degrees, -180 to 180
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
}

impl From<LocationDto> for LocationInput {
    fn from(dto: LocationDto) -> Self {
        Self {
            latitude: dto.latitude,
            longitude: dto.longitude,
            address: dto.address,
        }
    }
}

impl From<&SiteLocation> for LocationDto {
    fn from(location: &SiteLocation) -> Self {
        let coordinates = location.coordinates();
        Self {
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
            address: location.address().map(ToString::to_string),
        }
    }
}

/// Create vineyard request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "name": "Stags Leap Block 4",
    "location": {"latitude": 38.5025, "longitude": -122.2654},
    "gddBaseTemp": 50.0
}))]
pub struct CreateVineyardRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(nested)]
    pub location: LocationDto,
    /// Base temperature; defaults to 50 when omitted
    #[serde(default)]
    pub gdd_base_temp: Option<f64>,
}

/// Update vineyard request body (all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"gddBaseTemp": 55.0}))]
pub struct UpdateVineyardRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub location: Option<LocationDto>,
    #[serde(default)]
    pub gdd_base_temp: Option<f64>,
}

/// A stored vineyard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VineyardResponse {
    pub id: String,
    pub name: String,
    pub location: LocationDto,
    pub gdd_base_temp: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Vineyard> for VineyardResponse {
    fn from(vineyard: &Vineyard) -> Self {
        Self {
            id: vineyard.id().to_string(),
            name: vineyard.name().to_string(),
            location: vineyard.location().into(),
            gdd_base_temp: vineyard.gdd_base_temp(),
            created_at: vineyard.created_at(),
            updated_at: vineyard.updated_at(),
        }
    }
}

/// Season query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SeasonQuery {
    /// Season year; the current year when omitted
    pub year: Option<String>,
}

/// One day of the season series
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GddDayResponse {
    pub date: NaiveDate,
    /// Short label such as "Mar 1"
    pub date_formatted: String,
    /// Heat units for the day, rounded to one decimal
    #[serde(rename = "dailyGDD")]
    pub daily_gdd: f64,
    /// Running total through this day, rounded to a whole number
    #[serde(rename = "cumulativeGDD")]
    pub cumulative_gdd: i64,
    pub max_temp: f64,
    pub min_temp: f64,
}

impl From<DailyGddRecord> for GddDayResponse {
    fn from(record: DailyGddRecord) -> Self {
        Self {
            date: record.date,
            date_formatted: record.date_label,
            daily_gdd: record.daily_gdd,
            cumulative_gdd: record.cumulative_gdd,
            max_temp: record.max_temp,
            min_temp: record.min_temp,
        }
    }
}

/// Vineyard echo inside a season response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonVineyardResponse {
    pub name: String,
    pub location: LocationDto,
}

/// Season GDD series for one vineyard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonResponse {
    pub vineyard: SeasonVineyardResponse,
    pub gdd_data: Vec<GddDayResponse>,
    /// Unrounded season total
    #[serde(rename = "totalGDD")]
    pub total_gdd: f64,
    pub year: i32,
}

impl From<SeasonResult> for SeasonResponse {
    fn from(result: SeasonResult) -> Self {
        Self {
            vineyard: SeasonVineyardResponse {
                location: (&result.vineyard.location).into(),
                name: result.vineyard.name,
            },
            gdd_data: result.records.into_iter().map(Into::into).collect(),
            total_gdd: result.total_gdd,
            year: result.year,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Unknown and malformed IDs are indistinguishable to the caller
fn parse_id(raw: &str) -> Result<VineyardId, ApiError> {
    VineyardId::parse(raw).map_err(|_| ApiError::vineyard_not_found())
}

fn parse_year(raw: Option<&str>) -> Result<i32, ApiError> {
    match raw {
        None => Ok(Utc::now().year()),
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map_err(|_| ApiError::BadRequest(format!("year must be an integer, got '{value}'"))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Create a vineyard
#[utoipa::path(
    post,
    path = "/api/vineyards",
    tag = "vineyards",
    request_body = CreateVineyardRequest,
    responses(
        (status = 201, description = "Vineyard created", body = VineyardResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn create_vineyard(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateVineyardRequest>,
) -> Result<(StatusCode, Json<VineyardResponse>), ApiError> {
    let vineyard = state
        .vineyard_service
        .create(NewVineyard {
            name: request.name,
            location: request.location.into(),
            gdd_base_temp: request.gdd_base_temp,
        })
        .await?;

    info!(vineyard_id = %vineyard.id(), name = vineyard.name(), "Vineyard created");
    Ok((StatusCode::CREATED, Json(VineyardResponse::from(&vineyard))))
}

/// List all vineyards, newest first
#[utoipa::path(
    get,
    path = "/api/vineyards",
    tag = "vineyards",
    responses(
        (status = 200, description = "All vineyards", body = Vec<VineyardResponse>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_vineyards(
    State(state): State<AppState>,
) -> Result<Json<Vec<VineyardResponse>>, ApiError> {
    let vineyards = state.vineyard_service.list().await?;

    debug!(count = vineyards.len(), "Listed vineyards");
    Ok(Json(vineyards.iter().map(VineyardResponse::from).collect()))
}

/// Get a vineyard by ID
#[utoipa::path(
    get,
    path = "/api/vineyards/{id}",
    tag = "vineyards",
    params(("id" = String, Path, description = "Vineyard ID")),
    responses(
        (status = 200, description = "Vineyard", body = VineyardResponse),
        (status = 404, description = "Vineyard not found", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_vineyard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VineyardResponse>, ApiError> {
    let id = parse_id(&id)?;
    let vineyard = state.vineyard_service.get(&id).await?;
    Ok(Json(VineyardResponse::from(&vineyard)))
}

/// Partially update a vineyard
#[utoipa::path(
    put,
    path = "/api/vineyards/{id}",
    tag = "vineyards",
    params(("id" = String, Path, description = "Vineyard ID")),
    request_body = UpdateVineyardRequest,
    responses(
        (status = 200, description = "Updated vineyard", body = VineyardResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Vineyard not found", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_vineyard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVineyardRequest>,
) -> Result<Json<VineyardResponse>, ApiError> {
    let id = parse_id(&id)?;
    let update = VineyardUpdate {
        name: request.name,
        location: request.location.map(Into::into),
        gdd_base_temp: request.gdd_base_temp,
    };

    let vineyard = state.vineyard_service.update(&id, update).await?;
    Ok(Json(VineyardResponse::from(&vineyard)))
}

/// Delete a vineyard
#[utoipa::path(
    delete,
    path = "/api/vineyards/{id}",
    tag = "vineyards",
    params(("id" = String, Path, description = "Vineyard ID")),
    responses(
        (status = 204, description = "Vineyard deleted"),
        (status = 404, description = "Vineyard not found", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_vineyard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.vineyard_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Daily and cumulative GDD for one growing season
#[utoipa::path(
    get,
    path = "/api/vineyards/{id}/gdd",
    tag = "gdd",
    params(("id" = String, Path, description = "Vineyard ID"), SeasonQuery),
    responses(
        (status = 200, description = "Season series", body = SeasonResponse),
        (status = 400, description = "Invalid year", body = crate::error::ErrorResponse),
        (status = 404, description = "Vineyard not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Weather source failure", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state, query))]
pub async fn get_season_gdd(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<SeasonResponse>, ApiError> {
    let id = parse_id(&id)?;
    let year = parse_year(query.year.as_deref())?;

    let result = state.gdd_service.compute_season_gdd_by_id(&id, year).await?;

    debug!(
        year,
        days = result.records.len(),
        total_gdd = result.total_gdd,
        "Season computed"
    );
    Ok(Json(result.into()))
}
