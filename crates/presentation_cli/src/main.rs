//! Vigneron CLI
//!
//! Command-line interface for administration and querying a running server.

#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, AsyncDatabase, AsyncDatabaseConfig};
use presentation_cli::{
    ApiClient, Cli, Commands,
    cli::{SeasonFormat, log_filter_from_verbosity},
    client::NewVineyardArgs,
    output,
};
use presentation_http::openapi::ApiDoc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = ApiClient::new(&cli.url)?;

    match cli.command {
        Commands::Status => {
            let (ready, report) = client.ready().await?;
            println!(
                "📊 System Status: {}",
                if ready { "ready" } else { "not ready" }
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        },

        Commands::Health => match client.ready().await {
            Ok((true, _)) => {
                println!("✅ Healthy");
            },
            Ok((false, _)) => {
                println!("❌ Unhealthy: dependencies not ready");
                std::process::exit(1);
            },
            Err(e) => {
                println!("❌ Unhealthy: {e}");
                std::process::exit(1);
            },
        },

        Commands::Vineyards => {
            let vineyards = client.list_vineyards().await?;
            print!("{}", output::vineyard_table(&vineyards));
        },

        Commands::AddVineyard {
            name,
            lat,
            lon,
            address,
            base_temp,
        } => {
            let created = client
                .create_vineyard(&NewVineyardArgs {
                    name,
                    latitude: lat,
                    longitude: lon,
                    address,
                    gdd_base_temp: base_temp,
                })
                .await?;
            println!("🍇 Created vineyard {}", created.id);
            println!("{}", serde_json::to_string_pretty(&created)?);
        },

        Commands::Gdd { id, year, format } => {
            let season = client.season(&id, year).await?;
            let rendered = match format {
                SeasonFormat::Summary => output::season_summary(&season),
                SeasonFormat::Table => output::season_table(&season),
                SeasonFormat::Csv => output::season_csv(&season),
            };
            print!("{rendered}");
        },

        Commands::Migrate { database } => {
            println!("🗄️  Migrating {}", database.display());
            let db = AsyncDatabase::new(&AsyncDatabaseConfig::file(&database))
                .await
                .with_context(|| format!("opening {}", database.display()))?;
            db.migrate().await?;
            db.close().await;
            println!("✅ Migrations applied");
        },

        Commands::Config { config } => {
            let path = config.as_ref().map(|p| p.display().to_string());
            let config = AppConfig::load_from(path.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
        },

        Commands::Openapi { yaml, output } => {
            let doc = ApiDoc::openapi();
            let rendered = if yaml {
                doc.to_yaml()?
            } else {
                doc.to_pretty_json()?
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("📚 OpenAPI document written to {}", path.display());
                },
                None => println!("{rendered}"),
            }
        },
    }

    Ok(())
}
