use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, TransactionTrait};
use tracing::debug;

use crate::entities::{listing, Listing};

/// Rows per INSERT statement. Keeps bind parameters (rows x ~40 columns)
/// under the SQLite and PostgreSQL limits.
pub const ROWS_PER_STATEMENT: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Rows actually written.
    pub inserted: u64,
    /// Rows skipped because their reference_id already existed.
    pub skipped: u64,
}

/// Writes one batch atomically with insert-if-absent semantics on `reference_id`.
///
/// Either every non-conflicting row of the batch lands, or none does.
pub async fn insert_batch<C>(db: &C, mut models: Vec<listing::ActiveModel>) -> Result<BatchOutcome, DbErr>
where
    C: TransactionTrait,
{
    let total = models.len() as u64;
    if total == 0 {
        return Ok(BatchOutcome::default());
    }

    let txn = db.begin().await?;
    let mut inserted = 0u64;
    while !models.is_empty() {
        let size = ROWS_PER_STATEMENT.min(models.len());
        let rows: Vec<_> = models.drain(..size).collect();
        inserted += insert_ignoring_conflicts(&txn, rows).await?;
    }
    txn.commit().await?;

    debug!("batch committed: {} inserted, {} already present", inserted, total - inserted);
    Ok(BatchOutcome {
        inserted,
        skipped: total - inserted,
    })
}

async fn insert_ignoring_conflicts<C>(conn: &C, rows: Vec<listing::ActiveModel>) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    Listing::insert_many(rows)
        .on_conflict(
            OnConflict::column(listing::Column::ReferenceId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}
