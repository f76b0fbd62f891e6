//! Bulk listing import pipeline.
//!
//! ```text
//! archive ──► extracted CSV ──► ChunkReader ──► RawListing::into_active_model
//!                                                      │
//!            cleanup ◄── summary ◄── insert_batch ◄────┘
//! ```
//!
//! Only one chunk is held in memory at a time; each batch is one transaction
//! with `ON CONFLICT (reference_id) DO NOTHING`.

pub mod archive;
pub mod coerce;
pub mod progress;
pub mod reader;
pub mod record;
pub mod writer;

pub use archive::{open_input, DataFile, InputKind};
pub use progress::ImportProgress;
pub use reader::{count_data_lines, ChunkReader};
pub use record::{RawListing, Rejection};
pub use writer::{insert_batch, BatchOutcome};
