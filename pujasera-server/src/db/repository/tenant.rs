//! Tenant Repository

use super::{BaseRepository, RepoError, RepoResult, parse_ref};
use crate::db::models::{Tenant, TenantCreate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "tenant";

#[derive(Clone)]
pub struct TenantRepository {
    base: BaseRepository,
}

impl TenantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find tenant by id ("tenant:key" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tenant>> {
        let rid = parse_ref(TABLE, id)?;
        let tenant: Option<Tenant> = self.base.db().select(rid).await?;
        Ok(tenant)
    }

    /// All tenants operating in a venue
    pub async fn find_by_venue(&self, venue: &RecordId) -> RepoResult<Vec<Tenant>> {
        let tenants: Vec<Tenant> = self
            .base
            .db()
            .query("SELECT * FROM tenant WHERE venue = $venue ORDER BY name")
            .bind(("venue", venue.clone()))
            .await?
            .take(0)?;
        Ok(tenants)
    }

    /// Create a tenant stall with an explicit key so cart items can
    /// reference it by a stable id
    pub async fn create(&self, key: &str, data: TenantCreate) -> RepoResult<Tenant> {
        let rid = RecordId::from_table_key(TABLE, key);
        if self.find_by_id(&rid.to_string()).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Tenant '{}' already exists",
                key
            )));
        }

        let tenant = Tenant {
            id: None,
            name: data.name,
            venue: data.venue,
            pos_enabled: true,
        };

        let created: Option<Tenant> = self.base.db().create(rid).content(tenant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create tenant".to_string()))
    }
}
