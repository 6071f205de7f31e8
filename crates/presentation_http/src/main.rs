//! Vigneron HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{GddService, HealthService, VineyardRepository, VineyardService};
use infrastructure::{
    AppConfig, AsyncDatabase, SqliteDatabaseHealth, SqliteVineyardStore, build_weather_source,
    init_telemetry,
};
use presentation_http::{
    build_app, serve_with_drain_timeout, set_expose_internal_errors, state::AppState,
};
use tokio::{net::TcpListener, signal};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let _telemetry = init_telemetry(
        &config
            .telemetry
            .to_telemetry_config(config.server.json_logs()),
    )?;

    info!("🍇 Vigneron v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        environment = ?config.environment,
        host = %config.server.host,
        port = config.server.port,
        weather = ?config.weather.provider,
        database = %config.database.path,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.expose_internal_errors());

    // Persistence
    let database = AsyncDatabase::new(&(&config.database).into()).await?;
    if config.database.run_migrations {
        database.migrate().await?;
        info!("📦 Database migrations applied");
    }
    let pool = database.pool().clone();
    let repository: Arc<dyn VineyardRepository> =
        Arc::new(SqliteVineyardStore::new(pool.clone()));

    // Weather source
    let weather = build_weather_source(&config.weather)?;

    // Services
    let vineyard_service = VineyardService::new(Arc::clone(&repository));
    let gdd_service =
        GddService::new(repository, Arc::clone(&weather)).with_window(config.season_window()?);
    let health_service = HealthService::new(weather)
        .with_config(config.health.clone())
        .with_database(Arc::new(SqliteDatabaseHealth::new(pool)));

    let state = AppState {
        vineyard_service: Arc::new(vineyard_service),
        gdd_service: Arc::new(gdd_service),
        health_service: Arc::new(health_service),
    };

    let app = build_app(state, &config.server);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);
    info!("📚 API docs: http://{}/api-docs/openapi.json", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    serve_with_drain_timeout(listener, app, shutdown_signal(), shutdown_timeout).await?;

    database.close().await;
    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
