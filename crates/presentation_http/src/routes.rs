//! Route definitions and the middleware stack

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, middleware::RequestIdLayer, openapi, state::AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Vineyard API
        .route(
            "/api/vineyards",
            get(handlers::vineyards::list_vineyards).post(handlers::vineyards::create_vineyard),
        )
        .route(
            "/api/vineyards/{id}",
            get(handlers::vineyards::get_vineyard)
                .put(handlers::vineyards::update_vineyard)
                .delete(handlers::vineyards::delete_vineyard),
        )
        .route(
            "/api/vineyards/{id}/gdd",
            get(handlers::vineyards::get_season_gdd),
        )
        // API documentation
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .with_state(state)
}

/// Create the router wrapped in the server's middleware stack
///
/// Layers run outermost first: request ID, CORS, tracing, body limit.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    let app = create_router(state)
        .layer(DefaultBodyLimit::max(server.max_body_size_json_bytes))
        .layer(TraceLayer::new_for_http());

    let app = match cors_layer(server) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    app.layer(RequestIdLayer)
}

/// CORS policy from configuration; `None` when CORS is disabled
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    if server.allowed_origins.is_empty() {
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any),
    )
}
