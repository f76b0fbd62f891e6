use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};

use listingintel::config::{ImportConfig, DEFAULT_INPUT_FILE};
use listingintel::{db, run_import_listings};

/// Import real estate listings from the provided CSV dataset.
///
/// Chunk size, batch size and boolean handling come from IMPORT_CHUNK_SIZE,
/// IMPORT_BATCH_SIZE and IMPORT_BOOLEAN_MODE; the store from DATABASE_URL.
#[derive(Debug, Parser)]
#[command(name = "listingintel-import", version)]
struct Args {
    /// Path to the dataset file (.csv, .csv.tar.gz or .zip)
    #[arg(long, default_value = DEFAULT_INPUT_FILE)]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env (if present) so DATABASE_URL and IMPORT_* are visible
    let _ = dotenv();
    listingintel::init_tracing();

    let args = Args::parse();
    let config = ImportConfig::from_env().with_file(args.file);

    let conn = match db::connect().await {
        Ok(conn) => conn,
        Err(e) => {
            error!(?e, "failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    match run_import_listings(&conn, &config).await {
        Ok(report) => {
            info!("Import finished: {} inserted of {} rows read", report.inserted, report.rows_read);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error during import: {}", e);
            ExitCode::FAILURE
        }
    }
}
