//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use domain::VineyardId;

/// Default server URL, matching the server's default port
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Vigneron CLI
#[derive(Debug, Parser)]
#[command(name = "vigneron-cli")]
#[command(author, version, about = "Vineyard GDD tracker CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Server URL
    #[arg(
        short,
        long,
        global = true,
        env = "VIGNERON_URL",
        default_value = DEFAULT_SERVER_URL
    )]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show readiness of the server and its dependencies
    Status,

    /// Check system health (used by Docker healthcheck)
    ///
    /// Exits with status 1 when the server is not ready.
    Health,

    /// List vineyards, newest first
    Vineyards,

    /// Register a vineyard
    ///
    /// Example: vigneron-cli add-vineyard "Block 4" --lat 38.5 --lon -122.27
    AddVineyard {
        /// Vineyard name
        name: String,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Postal address
        #[arg(long)]
        address: Option<String>,

        /// GDD base temperature (server default when omitted)
        #[arg(long, allow_negative_numbers = true)]
        base_temp: Option<f64>,
    },

    /// Show the GDD season series for a vineyard
    Gdd {
        /// Vineyard ID
        #[arg(value_parser = parse_vineyard_id)]
        id: VineyardId,

        /// Season year (current year when omitted)
        #[arg(short, long)]
        year: Option<i32>,

        /// How to print the series
        #[arg(short, long, value_enum, default_value_t = SeasonFormat::Summary)]
        format: SeasonFormat,
    },

    /// Apply database migrations
    Migrate {
        /// Path to the SQLite database (created when missing)
        #[arg(short, long, default_value = "vigneron.db")]
        database: PathBuf,
    },

    /// Print the effective configuration as TOML
    ///
    /// Secrets are never printed.
    Config {
        /// Config file to load instead of `./config.toml`
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Export the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Output style for the season series
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeasonFormat {
    /// Season total and a few milestones
    Summary,
    /// One row per day
    Table,
    /// Comma-separated values with a header row
    Csv,
}

fn parse_vineyard_id(raw: &str) -> Result<VineyardId, String> {
    VineyardId::parse(raw).map_err(|e| format!("invalid vineyard ID: {e}"))
}

/// Determine log filter level from verbosity count
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
