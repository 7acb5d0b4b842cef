//! Venue Table Repository
//!
//! Reads and physical-table provisioning only. Virtual table creation
//! and release happen inside the intake and completion transactions.

use super::{BaseRepository, RepoError, RepoResult, parse_ref};
use crate::db::models::{VenueTable, VenueTableCreate};
use shared::order::TableStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "venue_table";

#[derive(Clone)]
pub struct VenueTableRepository {
    base: BaseRepository,
}

impl VenueTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All tables in a venue, virtual ones included
    pub async fn find_by_venue(&self, venue_id: &str) -> RepoResult<Vec<VenueTable>> {
        let venue = parse_ref("venue", venue_id)?;
        let tables: Vec<VenueTable> = self
            .base
            .db()
            .query("SELECT * FROM venue_table WHERE venue = $venue ORDER BY name")
            .bind(("venue", venue))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<VenueTable>> {
        let rid = parse_ref(TABLE, id)?;
        let table: Option<VenueTable> = self.base.db().select(rid).await?;
        Ok(table)
    }

    /// Provision a physical table
    pub async fn create_physical(&self, data: VenueTableCreate) -> RepoResult<VenueTable> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM venue_table WHERE venue = $venue AND name = $name LIMIT 1")
            .bind(("venue", data.venue.clone()))
            .bind(("name", data.name.clone()))
            .await?;
        let existing: Vec<VenueTable> = result.take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists in this venue",
                data.name
            )));
        }

        let table = VenueTable {
            id: None,
            venue: data.venue,
            name: data.name,
            status: TableStatus::Available,
            capacity: data.capacity.unwrap_or(4),
            is_virtual: false,
            current_order: None,
        };

        let created: Option<VenueTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
    }
}
