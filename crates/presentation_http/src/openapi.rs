//! OpenAPI documentation module
//!
//! Provides the OpenAPI 3.1 document for the Vigneron HTTP API, served as
//! JSON at `/api-docs/openapi.json`.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;

/// OpenAPI documentation for Vigneron
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vigneron API",
        description = "Vineyard site tracking and growing degree day accumulation",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Liveness and readiness endpoints"),
        (name = "vineyards", description = "Vineyard site management"),
        (name = "gdd", description = "Growing degree day season series")
    ),
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::vineyards::create_vineyard,
        handlers::vineyards::list_vineyards,
        handlers::vineyards::get_vineyard,
        handlers::vineyards::update_vineyard,
        handlers::vineyards::delete_vineyard,
        handlers::vineyards::get_season_gdd,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::health::ServiceStatus,
            handlers::vineyards::LocationDto,
            handlers::vineyards::CreateVineyardRequest,
            handlers::vineyards::UpdateVineyardRequest,
            handlers::vineyards::VineyardResponse,
            handlers::vineyards::GddDayResponse,
            handlers::vineyards::SeasonVineyardResponse,
            handlers::vineyards::SeasonResponse,
            crate::error::ErrorResponse,
        )
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
