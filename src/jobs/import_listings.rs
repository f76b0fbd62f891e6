use std::mem;
use std::time::{Duration, Instant};

use sea_orm::TransactionTrait;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::import::{count_data_lines, insert_batch, open_input, ChunkReader, ImportProgress, RawListing};
use crate::entities::listing;

/// Counters for one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Source records read (malformed ones excluded).
    pub rows_read: u64,
    /// Records that could not be deserialized at all.
    pub malformed: u64,
    /// Records dropped by the mapper (no reference).
    pub rejected: u64,
    pub inserted: u64,
    /// Records whose reference_id was already stored.
    pub duplicates: u64,
    pub batches_written: u64,
    pub batches_failed: u64,
    /// Records lost with failed batches.
    pub discarded: u64,
    pub elapsed: Duration,
}

/// Imports every listing of `config.file` into the store.
///
/// Pre-flight failures (missing input, archive without CSV) happen before any
/// write. A failed batch is logged and dropped; the run goes on. Errors reading
/// the source abort the run, leaving committed batches in place. A file
/// extracted from an archive is removed in every case.
pub async fn run_import_listings<C>(db: &C, config: &ImportConfig) -> Result<ImportReport, ImportError>
where
    C: TransactionTrait,
{
    ImportRun::new(config).execute(db).await
}

/// State of a single import invocation.
struct ImportRun<'a> {
    config: &'a ImportConfig,
    report: ImportReport,
    progress: Option<ImportProgress>,
}

impl<'a> ImportRun<'a> {
    fn new(config: &'a ImportConfig) -> Self {
        Self {
            config,
            report: ImportReport::default(),
            progress: None,
        }
    }

    async fn execute<C>(mut self, db: &C) -> Result<ImportReport, ImportError>
    where
        C: TransactionTrait,
    {
        let started = Instant::now();
        info!("Importing data from {}", self.config.file.display());

        // --- 1. Resolve input (extracting from the archive if needed) ---
        let data = open_input(&self.config.file, self.config.work_dir.as_deref())?;
        info!("Reading data from {}", data.path().display());

        // --- 2. Pre-scan for progress ---
        let total_rows = count_data_lines(data.path())?;
        self.progress = Some(ImportProgress::new(total_rows, self.config.quiet));
        info!(
            "{} rows to import (chunks of {}, batches of {}, {} booleans)",
            total_rows, self.config.chunk_size, self.config.batch_size, self.config.boolean_mode
        );

        // --- 3. Chunked read, transform, batched write ---
        let mut reader = ChunkReader::open(data.path(), self.config.chunk_size)?;
        while let Some(chunk) = reader.next_chunk()? {
            let rows = chunk.len() as u64;
            self.process_chunk(db, chunk).await;
            if let Some(progress) = &self.progress {
                progress.chunk_done(rows, self.report.inserted);
            }
        }
        self.report.malformed = reader.malformed();

        if let Some(progress) = self.progress.take() {
            progress.finish();
        }
        self.report.elapsed = started.elapsed();

        // --- 4. Summary ---
        let report = self.report;
        info!("Successfully imported {} listings.", report.rows_read);
        info!(
            "Inserted: {}, Skipped (duplicates): {}, Rejected: {}, Malformed: {}, Discarded: {} in {} failed batches",
            report.inserted,
            report.duplicates,
            report.rejected,
            report.malformed,
            report.discarded,
            report.batches_failed
        );
        info!("Import completed in {:.1}s.", report.elapsed.as_secs_f64());

        // Dropping `data` removes the extracted file.
        drop(data);
        Ok(report)
    }

    async fn process_chunk<C>(&mut self, db: &C, chunk: Vec<RawListing>)
    where
        C: TransactionTrait,
    {
        let batch_size = self.config.batch_size;
        let mut batch: Vec<listing::ActiveModel> = Vec::with_capacity(batch_size.min(chunk.len()));

        for raw in chunk {
            let first = self.report.rows_read == 0;
            self.report.rows_read += 1;
            if first {
                debug!("Sample row data: {:?}", raw);
            }

            match raw.into_active_model(self.config.boolean_mode) {
                Ok(model) => {
                    if first {
                        debug!(
                            "Sample listing data: reference_id={:?} dept_code={:?} surface={:?}",
                            model.reference_id, model.dept_code, model.surface
                        );
                    }
                    batch.push(model);
                }
                Err(rejection) => {
                    debug!("Dropping row {}: {}", self.report.rows_read, rejection);
                    self.report.rejected += 1;
                }
            }

            if batch.len() >= batch_size {
                self.flush(db, mem::take(&mut batch)).await;
            }
        }

        if !batch.is_empty() {
            self.flush(db, batch).await;
        }
    }

    async fn flush<C>(&mut self, db: &C, batch: Vec<listing::ActiveModel>)
    where
        C: TransactionTrait,
    {
        let size = batch.len();
        let number = self.report.batches_written + self.report.batches_failed + 1;

        match insert_batch(db, batch).await {
            Ok(outcome) => {
                self.report.batches_written += 1;
                self.report.inserted += outcome.inserted;
                self.report.duplicates += outcome.skipped;
            }
            Err(e) => {
                let err = ImportError::BatchWrite {
                    batch: number as usize,
                    size,
                    reason: e.to_string(),
                };
                error!("{}", err);
                if let Some(progress) = &self.progress {
                    progress.println(format!("Error in bulk insert: {}", err));
                }
                self.report.batches_failed += 1;
                self.report.discarded += size as u64;
            }
        }
    }
}
