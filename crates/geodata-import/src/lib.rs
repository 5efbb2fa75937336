//! Geodata Import CLI
//!
//! Imports a geolocation CSV dump into the geodata store through the
//! partitioned concurrent import pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use geodata_core::import::{ImportStats, Importer};
use geodata_core::store::PgStore;
use indicatif::ProgressBar;
use sqlx::postgres::PgPoolOptions;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::info;

/// Command-line arguments for the importer
#[derive(Debug, Parser)]
#[command(
    name = "geodata-import",
    about = "Import a geolocation CSV dump into the geodata store",
    version
)]
pub struct Cli {
    /// Path to the CSV file to import
    #[arg(long, short = 'f')]
    pub filepath: PathBuf,

    /// Number of import workers
    #[arg(long, short = 'w', env = "GEOIMPORT_WORKERS", default_value_t = 8)]
    pub workers: usize,

    /// Database connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgresql://localhost/geodata"
    )]
    pub database_url: String,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Connect to the database, apply migrations and run the import.
pub async fn run(cli: &Cli) -> Result<ImportStats> {
    info!(workers = cli.workers, "initializing database support");

    let pool = PgPoolOptions::new()
        .max_connections(cli.workers.max(1) as u32 + 1)
        .connect(&cli.database_url)
        .await
        .context("connecting to database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("applying database schema")?;

    let file = File::open(&cli.filepath)
        .await
        .with_context(|| format!("opening input file {}", cli.filepath.display()))?;
    let reader = BufReader::new(file);

    let importer = Importer::new(Arc::new(PgStore::new(pool)));

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("importing records");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = importer.import(reader, cli.workers).await;
    spinner.finish_and_clear();

    let stats = result.context("importing file")?;
    Ok(stats)
}
