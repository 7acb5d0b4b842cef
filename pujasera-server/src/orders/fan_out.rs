//! Order Fan-Out
//!
//! Turns one intake record into one parent order plus one sub-order per
//! involved tenant, all stamped with the same receipt number drawn from
//! the venue's sequential counter. The whole expansion runs as a single
//! transaction that also deletes the intake record, so fan-out is
//! exactly-once: a crash mid-way leaves the intake record intact for
//! retry, and a retry of an already-expanded record aborts before
//! writing anything.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use shared::order::{CartItem, TenantItemStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::db::models::IntakeRecord;

/// Fan-out failures, separated so the worker can tell a benign retry
/// from a record that needs another attempt
#[derive(Debug, Error)]
pub enum FanOutError {
    /// A parent order for this intake record already exists; the
    /// expansion happened on an earlier attempt
    #[error("Intake record already fanned out")]
    AlreadyFannedOut,

    #[error("Venue not found for intake record")]
    VenueNotFound,

    /// Nothing to expand; the record can only be dead-lettered
    #[error("Intake record has an empty cart")]
    EmptyCart,

    #[error("Intake record has no id")]
    MissingId,

    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Clone)]
pub struct FanOutService {
    db: Surreal<Db>,
}

impl FanOutService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Partition cart items by originating tenant, preserving item
    /// order within each partition
    pub fn partition_by_tenant(items: &[CartItem]) -> BTreeMap<String, Vec<CartItem>> {
        let mut partitions: BTreeMap<String, Vec<CartItem>> = BTreeMap::new();
        for item in items {
            partitions
                .entry(item.store_id.clone())
                .or_default()
                .push(item.clone());
        }
        partitions
    }

    /// Expand an intake record into parent + sub-orders
    ///
    /// Returns the receipt number stamped on every document. The
    /// transaction bumps the venue's receipt counter, so a concurrent
    /// expansion can make the commit conflict; those are retried.
    pub async fn fan_out(&self, intake: &IntakeRecord) -> Result<i64, FanOutError> {
        let intake_id = intake.id.clone().ok_or(FanOutError::MissingId)?;
        let partitions = Self::partition_by_tenant(&intake.payload.cart);
        if partitions.is_empty() {
            return Err(FanOutError::EmptyCart);
        }

        let items_status: BTreeMap<String, TenantItemStatus> = partitions
            .keys()
            .map(|k| (k.clone(), TenantItemStatus::Processing))
            .collect();
        let sql = Self::build_sql(partitions.len());

        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            match self
                .run_fan_out(&sql, &intake_id, intake, &items_status, &partitions)
                .await
            {
                Err(FanOutError::Database(msg))
                    if super::is_retryable_conflict(&msg) && attempt < super::TXN_MAX_RETRIES =>
                {
                    tokio::time::sleep(Duration::from_millis(10 * attempt)).await;
                }
                other => return other,
            }
        }
    }

    fn build_sql(partition_count: usize) -> String {
        let mut sql = String::from(
            "BEGIN TRANSACTION;
             LET $dup = (SELECT id FROM parent_order WHERE intake = $intake LIMIT 1);
             IF array::len($dup) > 0 { THROW \"ALREADY_FANNED_OUT\" };
             LET $venue = (UPDATE $venue_id SET receipt_counter += 1 RETURN AFTER);
             IF array::len($venue) == 0 { THROW \"VENUE_NOT_FOUND\" };
             LET $receipt = $venue[0].receipt_counter;
             CREATE parent_order CONTENT {
                 venue: $venue_id,
                 receipt_number: $receipt,
                 customer: $customer,
                 items: $items,
                 totals: $totals,
                 status: 'PROCESSING',
                 items_status: $items_status,
                 table: $table,
                 payment_method: $payment_method,
                 intake: $intake,
                 created_at: $now
             };\n",
        );
        for i in 0..partition_count {
            sql.push_str(&format!(
                "CREATE sub_order CONTENT {{
                     tenant: $tenant_{i},
                     venue: $venue_id,
                     receipt_number: $receipt,
                     items: $items_{i},
                     status: 'PROCESSING',
                     created_at: $now
                 }};\n"
            ));
        }
        sql.push_str(
            "DELETE $intake;
             RETURN $receipt;
             COMMIT TRANSACTION;",
        );
        sql
    }

    async fn run_fan_out(
        &self,
        sql: &str,
        intake_id: &RecordId,
        intake: &IntakeRecord,
        items_status: &BTreeMap<String, TenantItemStatus>,
        partitions: &BTreeMap<String, Vec<CartItem>>,
    ) -> Result<i64, FanOutError> {
        let now = Utc::now().timestamp_millis();
        let mut query = self
            .db
            .query(sql)
            .bind(("intake", intake_id.clone()))
            .bind(("venue_id", intake.venue.clone()))
            .bind(("customer", intake.payload.customer.clone()))
            .bind(("items", intake.payload.cart.clone()))
            .bind(("totals", intake.payload.totals.clone()))
            .bind(("items_status", items_status.clone()))
            .bind(("table", intake.table.clone()))
            .bind(("payment_method", intake.payload.payment_method))
            .bind(("now", now));
        for (i, (tenant_key, items)) in partitions.iter().enumerate() {
            query = query
                .bind((
                    format!("tenant_{i}"),
                    RecordId::from_table_key("tenant", tenant_key.as_str()),
                ))
                .bind((format!("items_{i}"), items.clone()));
        }

        let mut response = query.await.map_err(|e| map_fan_out_error(&e.to_string()))?;
        // THROW markers surface in the per-statement errors, never in
        // the RETURN slot of an aborted transaction
        if let Some(msg) = super::transaction_failure(&mut response) {
            return Err(map_fan_out_error(&msg));
        }
        let last = response.num_statements().saturating_sub(1);
        let receipt: Option<i64> = response
            .take(last)
            .map_err(|e| map_fan_out_error(&e.to_string()))?;
        receipt.ok_or_else(|| {
            FanOutError::Database("Fan-out transaction returned no receipt".to_string())
        })
    }
}

fn map_fan_out_error(msg: &str) -> FanOutError {
    if msg.contains("ALREADY_FANNED_OUT") {
        FanOutError::AlreadyFannedOut
    } else if msg.contains("VENUE_NOT_FOUND") {
        FanOutError::VenueNotFound
    } else {
        FanOutError::Database(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(store: &str, product: &str, price: f64, qty: i32) -> CartItem {
        CartItem {
            store_id: store.into(),
            store_name: format!("Stall {}", store),
            product_id: product.into(),
            name: product.into(),
            price,
            quantity: qty,
            note: None,
        }
    }

    #[test]
    fn test_partition_groups_by_tenant() {
        let cart = vec![
            item("a", "sate", 15000.0, 2),
            item("b", "es_teh", 5000.0, 1),
            item("a", "lontong", 8000.0, 1),
        ];
        let partitions = FanOutService::partition_by_tenant(&cart);
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions["a"].len(), 2);
        assert_eq!(partitions["b"].len(), 1);
        // item order within a partition follows cart order
        assert_eq!(partitions["a"][0].product_id, "sate");
        assert_eq!(partitions["a"][1].product_id, "lontong");
    }

    #[test]
    fn test_partition_covers_every_item() {
        let cart = vec![
            item("a", "p1", 1000.0, 1),
            item("b", "p2", 2000.0, 2),
            item("c", "p3", 3000.0, 3),
        ];
        let partitions = FanOutService::partition_by_tenant(&cart);
        let total: usize = partitions.values().map(Vec::len).sum();
        assert_eq!(total, cart.len());
    }

    #[test]
    fn test_partition_empty_cart() {
        assert!(FanOutService::partition_by_tenant(&[]).is_empty());
    }
}
