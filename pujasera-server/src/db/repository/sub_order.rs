//! Sub-Order Repository

use super::{BaseRepository, RepoResult, parse_ref};
use crate::db::models::SubOrder;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct SubOrderRepository {
    base: BaseRepository,
}

impl SubOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Look up a tenant's sub-order by receipt number
    pub async fn find_by_receipt(
        &self,
        tenant_id: &str,
        receipt_number: i64,
    ) -> RepoResult<Option<SubOrder>> {
        let tenant = parse_ref("tenant", tenant_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM sub_order \
                 WHERE tenant = $tenant AND receipt_number = $receipt LIMIT 1",
            )
            .bind(("tenant", tenant))
            .bind(("receipt", receipt_number))
            .await?;
        let orders: Vec<SubOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Active (non-terminal) sub-orders for a tenant stall, oldest
    /// checkout first
    pub async fn find_active_by_tenant(&self, tenant_id: &str) -> RepoResult<Vec<SubOrder>> {
        let tenant = parse_ref("tenant", tenant_id)?;
        let orders: Vec<SubOrder> = self
            .base
            .db()
            .query(
                "SELECT * FROM sub_order \
                 WHERE tenant = $tenant \
                 AND status NOT IN ['COMPLETED', 'COMPLETED_PAID', 'CANCELLED'] \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant", tenant))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All sub-orders sharing a venue receipt number
    pub async fn find_by_venue_receipt(
        &self,
        venue_id: &str,
        receipt_number: i64,
    ) -> RepoResult<Vec<SubOrder>> {
        let venue = parse_ref("venue", venue_id)?;
        let orders: Vec<SubOrder> = self
            .base
            .db()
            .query(
                "SELECT * FROM sub_order \
                 WHERE venue = $venue AND receipt_number = $receipt",
            )
            .bind(("venue", venue))
            .bind(("receipt", receipt_number))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
