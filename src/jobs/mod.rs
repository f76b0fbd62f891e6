pub mod bienici_listing;
pub mod import_listings;

pub use bienici_listing::run_bienici_listing;
pub use import_listings::{run_import_listings, ImportReport};
