//! Venue Repository

use super::{BaseRepository, RepoError, RepoResult, parse_ref};
use crate::db::models::{Venue, VenueCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "venue";

#[derive(Clone)]
pub struct VenueRepository {
    base: BaseRepository,
}

impl VenueRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find venue by id ("venue:key" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Venue>> {
        let rid = parse_ref(TABLE, id)?;
        let venue: Option<Venue> = self.base.db().select(rid).await?;
        Ok(venue)
    }

    /// Find venue by its public slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Venue>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM venue WHERE group_slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?;
        let venues: Vec<Venue> = result.take(0)?;
        Ok(venues.into_iter().next())
    }

    /// Resolve a venue from the identity the checkout client sends,
    /// which may be a record id or a slug
    pub async fn resolve(&self, identity: &str) -> RepoResult<Venue> {
        if identity.contains(':') {
            if let Some(venue) = self.find_by_id(identity).await? {
                return Ok(venue);
            }
        } else if let Some(venue) = self.find_by_slug(identity).await? {
            return Ok(venue);
        } else if let Some(venue) = self.find_by_id(identity).await? {
            return Ok(venue);
        }
        Err(RepoError::NotFound(format!("Venue {} not found", identity)))
    }

    /// Create a new venue with counters at zero
    pub async fn create(&self, data: VenueCreate) -> RepoResult<Venue> {
        if self.find_by_slug(&data.group_slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Venue slug '{}' already exists",
                data.group_slug
            )));
        }

        let venue = Venue {
            id: None,
            name: data.name,
            group_slug: data.group_slug,
            virtual_table_counter: 0,
            receipt_counter: 0,
            tenants: Vec::new(),
        };

        let created: Option<Venue> = self.base.db().create(TABLE).content(venue).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create venue".to_string()))
    }

    /// Register a tenant stall on the venue
    pub async fn add_tenant(&self, venue_id: &str, tenant_id: &str) -> RepoResult<()> {
        let venue = parse_ref(TABLE, venue_id)?;
        let tenant = parse_ref("tenant", tenant_id)?;
        self.base
            .db()
            .query("UPDATE $venue SET tenants += $tenant WHERE $tenant NOT IN tenants")
            .bind(("venue", venue))
            .bind(("tenant", tenant))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }
}
