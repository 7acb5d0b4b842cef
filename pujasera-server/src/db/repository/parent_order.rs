//! Parent Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_ref};
use crate::db::models::ParentOrder;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ParentOrderRepository {
    base: BaseRepository,
}

impl ParentOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Look up an order by its venue-scoped receipt number
    pub async fn find_by_receipt(
        &self,
        venue_id: &str,
        receipt_number: i64,
    ) -> RepoResult<Option<ParentOrder>> {
        let venue = parse_ref("venue", venue_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM parent_order \
                 WHERE venue = $venue AND receipt_number = $receipt LIMIT 1",
            )
            .bind(("venue", venue))
            .bind(("receipt", receipt_number))
            .await?;
        let orders: Vec<ParentOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Active (non-terminal) orders for a venue, oldest checkout first
    pub async fn find_active_by_venue(&self, venue_id: &str) -> RepoResult<Vec<ParentOrder>> {
        let venue = parse_ref("venue", venue_id)?;
        let orders: Vec<ParentOrder> = self
            .base
            .db()
            .query(
                "SELECT * FROM parent_order \
                 WHERE venue = $venue \
                 AND status NOT IN ['COMPLETED', 'COMPLETED_PAID', 'CANCELLED'] \
                 ORDER BY created_at ASC",
            )
            .bind(("venue", venue))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// The order fanned out from a given intake record, if any
    pub async fn find_by_intake(&self, intake_id: &str) -> RepoResult<Option<ParentOrder>> {
        let intake = parse_ref("intake_queue", intake_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM parent_order WHERE intake = $intake LIMIT 1")
            .bind(("intake", intake))
            .await?;
        let orders: Vec<ParentOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Fetch by receipt or fail with NotFound
    pub async fn get_by_receipt(
        &self,
        venue_id: &str,
        receipt_number: i64,
    ) -> RepoResult<ParentOrder> {
        self.find_by_receipt(venue_id, receipt_number)
            .await?
            .ok_or_else(|| {
                RepoError::NotFound(format!(
                    "Order #{} not found in venue {}",
                    receipt_number, venue_id
                ))
            })
    }
}
