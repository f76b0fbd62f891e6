//! Real-estate listing store: bulk CSV importer, listing statistics and
//! single-listing ingestion from BienIci.

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod import;
pub mod jobs;
pub mod stats;

pub use config::{BooleanMode, ImportConfig};
pub use error::{AppError, ImportError};
pub use jobs::{run_bienici_listing, run_import_listings, ImportReport};
pub use stats::{compute_statistics, ListingStatistics, StatisticsQuery};

/// Installs the fmt subscriber used by the binaries.
///
/// `RUST_LOG` wins when set; otherwise INFO and above are printed.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
