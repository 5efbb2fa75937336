//! Geodata Import - Main entry point

use clap::Parser;
use geodata_common::logging::{init_logging, LogConfig, LogLevel};
use geodata_import::{run, Cli};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        })
        .log_file_prefix("geodata-import".to_string())
        .build();

    // Environment variables take precedence
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // The importer should still work when logging cannot be set up
    let _ = init_logging(&log_config);

    match run(&cli).await {
        Ok(stats) => {
            info!(
                total = stats.total,
                good = stats.good,
                failed = stats.failed,
                duration_ms = stats.duration.as_millis() as u64,
                "import finished"
            );
            println!(
                "Imported {} lines in {:.2}s: {} good, {} failed",
                stats.total,
                stats.duration.as_secs_f64(),
                stats.good,
                stats.failed
            );
        },
        Err(e) => {
            error!(error = %e, "import failed");
            eprintln!("Error: {:#}", e);
            process::exit(1);
        },
    }
}
