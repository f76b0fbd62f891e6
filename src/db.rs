use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::{debug, info};

use crate::config;
use crate::entities::{listing, Listing};

/// Connects to `DATABASE_URL` (SQLite file by default) and makes sure the
/// `listings` table exists.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    connect_to(&config::database_url()).await
}

pub async fn connect_to(url: &str) -> Result<DatabaseConnection, DbErr> {
    let backend = if url.starts_with("postgres") { "PostgreSQL" } else { "SQLite" };
    info!("Connecting to database: {}", backend);

    let db = Database::connect(url).await?;
    ensure_schema(&db).await?;
    Ok(db)
}

/// Creates the `listings` table and its indexes when missing.
pub async fn ensure_schema<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(Listing);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for index in lookup_indexes() {
        db.execute(backend.build(&index)).await?;
    }

    debug!("listings schema ready");
    Ok(())
}

// Statistics filter on these columns.
fn lookup_indexes() -> Vec<IndexCreateStatement> {
    [
        ("idx_listings_dept_code", listing::Column::DeptCode),
        ("idx_listings_postal_code", listing::Column::PostalCode),
        ("idx_listings_city", listing::Column::City),
    ]
    .into_iter()
    .map(|(name, column)| {
        Index::create()
            .name(name)
            .table(Listing)
            .col(column)
            .if_not_exists()
            .to_owned()
    })
    .collect()
}
