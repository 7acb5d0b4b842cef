//! Repository Module
//!
//! Read-side and provisioning access to the SurrealDB tables. The
//! multi-document writes (intake batch, fan-out, status sync, table
//! lifecycle) live in `crate::orders` as single transactions; the
//! repositories here never mutate more than one document at a time.

pub mod intake;
pub mod parent_order;
pub mod sub_order;
pub mod tenant;
pub mod venue;
pub mod venue_table;

pub use intake::IntakeRepository;
pub use parent_order::ParentOrderRepository;
pub use sub_order::SubOrderRepository;
pub use tenant::TenantRepository;
pub use venue::VenueRepository;
pub use venue_table::VenueTableRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may be "table:key" or a bare key
///
/// All public identifiers travel as strings; this pins them to the
/// expected table so a tenant id can never address a venue record.
pub fn parse_ref(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if rid.table() != table {
            return Err(RepoError::Validation(format!(
                "Expected {} reference, got: {}",
                table, id
            )));
        }
        Ok(rid)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref_bare_key() {
        let rid = parse_ref("venue", "foodcourt1").unwrap();
        assert_eq!(rid.to_string(), "venue:foodcourt1");
    }

    #[test]
    fn test_parse_ref_full_form() {
        let rid = parse_ref("tenant", "tenant:warung_a").unwrap();
        assert_eq!(rid.key().to_string(), "warung_a");
    }

    #[test]
    fn test_parse_ref_wrong_table_rejected() {
        assert!(matches!(
            parse_ref("venue", "tenant:warung_a"),
            Err(RepoError::Validation(_))
        ));
    }
}
