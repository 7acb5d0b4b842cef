//! Order Orchestrator
//!
//! The kitchen-status transitions that span documents. Every operation
//! here is one transaction: the sub-order, the parent order's
//! `items_status` map and (on completion) the anchoring table commit
//! together or not at all. A customer can never see a stall marked
//! ready while the stall's own view still says processing.

use chrono::Utc;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::ParentOrder;
use crate::db::repository::parse_ref;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Result of completing or cancelling an order
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeOutcome {
    pub order: ParentOrder,
    /// Name of the table that was released, if the order had one
    pub released_table: Option<String>,
}

#[derive(Clone)]
pub struct OrderOrchestrator {
    db: Surreal<Db>,
}

impl OrderOrchestrator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Tenant marks its slice of an order ready for pickup
    ///
    /// Updates the tenant's sub-order and the parent order's
    /// `items_status` entry in one transaction. Re-marking an
    /// already-ready slice is a no-op success. When the parent order is
    /// missing, the sub-order update rolls back and the error names
    /// both halves of the join key.
    pub async fn mark_ready(
        &self,
        venue_id: &str,
        tenant_id: &str,
        receipt_number: i64,
    ) -> AppResult<ParentOrder> {
        let venue = parse_ref("venue", venue_id).map_err(|e| AppError::validation(e.to_string()))?;
        let tenant =
            parse_ref("tenant", tenant_id).map_err(|e| AppError::validation(e.to_string()))?;
        let tenant_key = tenant.key().to_string();

        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $sub = (SELECT * FROM sub_order \
                     WHERE tenant = $tenant AND receipt_number = $receipt LIMIT 1);
                 IF array::len($sub) == 0 { THROW \"SUB_ORDER_NOT_FOUND\" };
                 IF $sub[0].status IN ['COMPLETED', 'COMPLETED_PAID', 'CANCELLED'] {
                     THROW \"SUB_ORDER_NOT_ACTIVE\"
                 };
                 UPDATE $sub[0].id SET status = 'READY_FOR_PICKUP';
                 LET $parent = (UPDATE parent_order \
                     SET items_status[$tenant_key] = 'READY_FOR_PICKUP' \
                     WHERE venue = $venue AND receipt_number = $receipt RETURN AFTER);
                 IF array::len($parent) == 0 { THROW \"PARENT_ORDER_NOT_FOUND\" };
                 RETURN $parent[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("venue", venue))
            .bind(("tenant", tenant))
            .bind(("tenant_key", tenant_key))
            .bind(("receipt", receipt_number))
            .await
            .map_err(|e| map_status_error(&e.to_string(), venue_id, tenant_id, receipt_number))?;

        // An aborted transaction carries its THROW marker in the
        // per-statement errors, not in the RETURN slot
        if let Some(msg) = super::transaction_failure(&mut response) {
            return Err(map_status_error(&msg, venue_id, tenant_id, receipt_number));
        }
        let last = response.num_statements().saturating_sub(1);
        let parent: Option<ParentOrder> = response
            .take(last)
            .map_err(|e| map_status_error(&e.to_string(), venue_id, tenant_id, receipt_number))?;
        parent.ok_or_else(|| AppError::database("Mark-ready transaction returned no order"))
    }

    /// Venue finalizes an order as handed over
    ///
    /// Allowed from any non-terminal status, even when some slices are
    /// still processing. Cascades COMPLETED to the sub-orders and
    /// releases the anchoring table in the same transaction: a virtual
    /// WEB-n table is deleted, a physical table goes to
    /// AWAITING_CLEANUP with its order snapshot cleared.
    pub async fn complete(&self, venue_id: &str, receipt_number: i64) -> AppResult<FinalizeOutcome> {
        let venue = parse_ref("venue", venue_id).map_err(|e| AppError::validation(e.to_string()))?;
        let now = Utc::now().timestamp_millis();

        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $order = (SELECT * FROM parent_order \
                     WHERE venue = $venue AND receipt_number = $receipt LIMIT 1);
                 IF array::len($order) == 0 { THROW \"PARENT_ORDER_NOT_FOUND\" };
                 IF $order[0].status = 'CANCELLED' { THROW \"ORDER_CANCELLED\" };
                 IF $order[0].status IN ['COMPLETED', 'COMPLETED_PAID'] { THROW \"ORDER_COMPLETED\" };
                 UPDATE sub_order SET status = 'COMPLETED' \
                     WHERE venue = $venue AND receipt_number = $receipt AND status != 'CANCELLED';
                 LET $updated = (UPDATE $order[0].id \
                     SET status = 'COMPLETED', completed_at = $now RETURN AFTER);
                 LET $tbl = IF $order[0].table != NONE {
                     (SELECT * FROM ONLY $order[0].table)
                 } ELSE {
                     NONE
                 };
                 IF $tbl != NONE {
                     IF $tbl.is_virtual {
                         DELETE $order[0].table;
                     } ELSE {
                         UPDATE $order[0].table SET status = 'AWAITING_CLEANUP', current_order = NONE;
                     };
                 };
                 RETURN { order: $updated[0], released_table: $tbl.name };
                 COMMIT TRANSACTION;",
            )
            .bind(("venue", venue))
            .bind(("receipt", receipt_number))
            .bind(("now", now))
            .await
            .map_err(|e| map_finalize_error(&e.to_string(), venue_id, receipt_number))?;

        take_finalize(&mut response, venue_id, receipt_number)
    }

    /// Venue cancels an order that is still fully in preparation
    ///
    /// Only allowed while the parent order is PROCESSING. Cascades
    /// CANCELLED to the sub-orders and releases the anchoring table: a
    /// virtual table is deleted, a physical one returns to AVAILABLE
    /// since nothing was served on it.
    pub async fn cancel(&self, venue_id: &str, receipt_number: i64) -> AppResult<FinalizeOutcome> {
        let venue = parse_ref("venue", venue_id).map_err(|e| AppError::validation(e.to_string()))?;

        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $order = (SELECT * FROM parent_order \
                     WHERE venue = $venue AND receipt_number = $receipt LIMIT 1);
                 IF array::len($order) == 0 { THROW \"PARENT_ORDER_NOT_FOUND\" };
                 IF $order[0].status = 'CANCELLED' { THROW \"ORDER_CANCELLED\" };
                 IF $order[0].status IN ['COMPLETED', 'COMPLETED_PAID'] { THROW \"ORDER_COMPLETED\" };
                 IF $order[0].status != 'PROCESSING' { THROW \"ORDER_NOT_CANCELLABLE\" };
                 UPDATE sub_order SET status = 'CANCELLED' \
                     WHERE venue = $venue AND receipt_number = $receipt;
                 LET $updated = (UPDATE $order[0].id SET status = 'CANCELLED' RETURN AFTER);
                 LET $tbl = IF $order[0].table != NONE {
                     (SELECT * FROM ONLY $order[0].table)
                 } ELSE {
                     NONE
                 };
                 IF $tbl != NONE {
                     IF $tbl.is_virtual {
                         DELETE $order[0].table;
                     } ELSE {
                         UPDATE $order[0].table SET status = 'AVAILABLE', current_order = NONE;
                     };
                 };
                 RETURN { order: $updated[0], released_table: $tbl.name };
                 COMMIT TRANSACTION;",
            )
            .bind(("venue", venue))
            .bind(("receipt", receipt_number))
            .await
            .map_err(|e| map_finalize_error(&e.to_string(), venue_id, receipt_number))?;

        take_finalize(&mut response, venue_id, receipt_number)
    }
}

fn take_finalize(
    response: &mut surrealdb::Response,
    venue_id: &str,
    receipt_number: i64,
) -> AppResult<FinalizeOutcome> {
    if let Some(msg) = super::transaction_failure(response) {
        return Err(map_finalize_error(&msg, venue_id, receipt_number));
    }
    let last = response.num_statements().saturating_sub(1);
    let outcome: Option<FinalizeOutcome> = response
        .take(last)
        .map_err(|e| map_finalize_error(&e.to_string(), venue_id, receipt_number))?;
    outcome.ok_or_else(|| AppError::database("Finalize transaction returned no order"))
}

/// Translate mark-ready transaction aborts into domain errors
fn map_status_error(msg: &str, venue_id: &str, tenant_id: &str, receipt_number: i64) -> AppError {
    if msg.contains("SUB_ORDER_NOT_FOUND") {
        AppError::sub_order_not_found(tenant_id, receipt_number)
    } else if msg.contains("SUB_ORDER_NOT_ACTIVE") {
        AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!(
                "Sub-order for tenant {} with receipt #{} is already finalized",
                tenant_id, receipt_number
            ),
        )
    } else if msg.contains("PARENT_ORDER_NOT_FOUND") {
        parent_not_found(venue_id, receipt_number)
    } else {
        AppError::database(msg.to_string())
    }
}

/// Translate complete/cancel transaction aborts into domain errors
fn map_finalize_error(msg: &str, venue_id: &str, receipt_number: i64) -> AppError {
    if msg.contains("PARENT_ORDER_NOT_FOUND") {
        parent_not_found(venue_id, receipt_number)
    } else if msg.contains("ORDER_CANCELLED") {
        AppError::with_message(
            ErrorCode::OrderAlreadyCancelled,
            format!("Order #{} is already cancelled", receipt_number),
        )
    } else if msg.contains("ORDER_COMPLETED") {
        AppError::with_message(
            ErrorCode::OrderAlreadyCompleted,
            format!("Order #{} is already completed", receipt_number),
        )
    } else if msg.contains("ORDER_NOT_CANCELLABLE") {
        AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!(
                "Order #{} is past preparation and can no longer be cancelled",
                receipt_number
            ),
        )
    } else {
        AppError::database(msg.to_string())
    }
}

fn parent_not_found(venue_id: &str, receipt_number: i64) -> AppError {
    AppError::with_message(
        ErrorCode::OrderNotFound,
        format!(
            "Order with receipt #{} not found in venue {}",
            receipt_number, venue_id
        ),
    )
    .with_detail("venue_id", venue_id)
    .with_detail("receipt_number", receipt_number)
}
