use std::path::PathBuf;
use thiserror::Error;

/// Public location of the reference dataset, shown when the input is missing.
pub const DATASET_URL: &str =
    "https://storage.googleapis.com/data.meilleurecopro.com/stage/dataset_annonces.csv.tar.gz";

/// Errors raised by a bulk import run.
///
/// `MissingInput` and `NoDataFileInArchive` are pre-flight failures: nothing has
/// been written when they occur. `Io`, `Csv`, `Archive` and `Database` abort a run
/// that may already have committed batches.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File {} not found! Please download it from {}", .0.display(), DATASET_URL)]
    MissingInput(PathBuf),

    #[error("No CSV file found in archive {}", .0.display())]
    NoDataFileInArchive(PathBuf),

    #[error("Could not coerce {column} value {raw:?}")]
    FieldCoercion { column: &'static str, raw: String },

    #[error("Batch {batch} of {size} listings was discarded: {reason}")]
    BatchWrite {
        batch: usize,
        size: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<zip::result::ZipError> for ImportError {
    fn from(err: zip::result::ZipError) -> Self {
        ImportError::Archive(err.to_string())
    }
}

impl ImportError {
    /// True for failures detected before any file was extracted or row written.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            ImportError::MissingInput(_) | ImportError::NoDataFileInArchive(_)
        )
    }
}

/// Errors raised by the statistics and single-listing operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No data found for {0}")]
    NotFound(String),

    #[error("Error fetching data from BienIci: {0}")]
    FetchError(String),

    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}
