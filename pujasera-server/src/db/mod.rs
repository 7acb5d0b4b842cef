//! Database Module
//!
//! Embedded SurrealDB document store. Ownership boundaries follow the
//! domain: venue-owned tables (`venue`, `venue_table`, `parent_order`,
//! `intake_queue`) and tenant-owned `sub_order` records joined to their
//! parent by receipt number.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::connect(db).await?;
        tracing::info!(path = db_path, "Database connection established");
        Ok(service)
    }

    /// Open an in-memory database. Used by tests and local development.
    pub async fn new_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::connect(db).await
    }

    async fn connect(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns("pujasera")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Define indexes backing the uniqueness invariants
///
/// - one parent order per (venue, receipt) and one sub-order per
///   (tenant, receipt): receipt numbers are the cross-space join key
///   and must never be duplicated
/// - one parent order per intake record: the store-level backstop for
///   exactly-once fan-out
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "DEFINE INDEX IF NOT EXISTS venue_slug ON TABLE venue COLUMNS group_slug UNIQUE;
         DEFINE INDEX IF NOT EXISTS parent_order_receipt ON TABLE parent_order COLUMNS venue, receipt_number UNIQUE;
         DEFINE INDEX IF NOT EXISTS sub_order_receipt ON TABLE sub_order COLUMNS tenant, receipt_number UNIQUE;
         DEFINE INDEX IF NOT EXISTS parent_order_intake ON TABLE parent_order COLUMNS intake UNIQUE;",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
