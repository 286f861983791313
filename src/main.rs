use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use telegram_raw_loader::config::{AppConfig, DatabaseConfig};
use telegram_raw_loader::logging::init_logging;
use telegram_raw_loader::{Database, LoadService, Partition};

/// Load raw Telegram messages from JSON to PostgreSQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Date partition to load (YYYY-MM-DD)
    #[arg(long, default_value = "2026-01-18")]
    date: String,

    /// Base data directory
    #[arg(long, default_value = "data")]
    path: PathBuf,
}

/// Failures before logging is up are reported by `anyhow`; later ones are
/// logged once and turned into a failing exit code.
fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // A missing .env is fine, variables may come from the real environment
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging, keep the guard so the file writer flushes on exit
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting telegram-raw-loader");

    if let Err(err) = run(&cli, &config) {
        error!("Error: {:?}", err);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    let db_config = DatabaseConfig::from_env().context("Failed to read POSTGRES_* settings")?;
    let database = Database::connect(&db_config).context("Failed to connect to PostgreSQL")?;

    let mut service = LoadService::new(Box::new(database), config.loader.batch_size)?;
    let partition = Partition::new(&cli.path, &cli.date);

    service
        .run(&partition)
        .with_context(|| format!("Failed to load partition {}", partition.dir().display()))?;

    Ok(())
}
