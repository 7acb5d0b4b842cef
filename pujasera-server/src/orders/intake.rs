//! Order Intake
//!
//! Accepts a validated checkout and performs the intake batch as one
//! transaction: for pay-at-cashier checkouts the venue's virtual table
//! counter is incremented, a WEB-n table is created to anchor the
//! order, and the intake record is enqueued. Either all three documents
//! commit or none do; a crash between them can never leave an orphan
//! table or a lost checkout.

use chrono::Utc;
use serde::Deserialize;
use shared::order::{
    CartItem, CurrentOrderSnapshot, CustomerRef, OrderTotals, PaymentMethod, TableSnapshot,
};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::db::models::{CheckoutPayload, IntakeRecord, VenueTable};
use crate::db::repository::{RepoError, TenantRepository, VenueRepository, parse_ref};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Checkout submitted by the customer-facing channel, already shaped
/// by the API layer
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Venue record id or public slug
    pub venue_identity: String,
    pub customer: CustomerRef,
    pub cart: Vec<CartItem>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    /// Physical table the customer ordered from, when the checkout
    /// came from a table-side channel
    pub table_id: Option<String>,
}

/// What intake produced: the queued record plus the table anchoring
/// the order, if one was assigned
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub intake_id: String,
    pub table: Option<TableSnapshot>,
}

#[derive(Debug, Deserialize)]
struct IntakeTxnResult {
    table: Option<VenueTable>,
    intake: IntakeRecord,
}

#[derive(Clone)]
pub struct IntakeService {
    db: Surreal<Db>,
}

impl IntakeService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Validate and enqueue a checkout
    pub async fn submit(&self, req: CheckoutRequest) -> AppResult<IntakeOutcome> {
        Self::validate(&req)?;

        let venues = VenueRepository::new(self.db.clone());
        let venue = venues.resolve(&req.venue_identity).await.map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::VenueNotFound, msg),
            other => AppError::database(other.to_string()),
        })?;
        let venue_id = venue
            .id
            .ok_or_else(|| AppError::internal("Venue record missing id"))?;

        self.check_tenants(&venue_id, &req.cart).await?;

        let snapshot = CurrentOrderSnapshot {
            items: req.cart.clone(),
            total_amount: req.totals.total_amount,
            customer: req.customer.clone(),
            payment_method: req.payment_method,
            order_time: Utc::now(),
        };
        let payload = CheckoutPayload {
            customer: req.customer,
            cart: req.cart,
            totals: req.totals,
            payment_method: req.payment_method,
        };
        let from_catalog = req.table_id.is_none();
        let now = Utc::now().timestamp_millis();

        let result = match (&req.table_id, req.payment_method) {
            // Table-side checkout: anchor on the physical table
            (Some(table_id), _) => {
                let table = parse_ref("venue_table", table_id)
                    .map_err(|e| AppError::validation(e.to_string()))?;
                self.submit_with_table(&venue_id, table, payload, snapshot, from_catalog, now)
                    .await?
            }
            // Catalog checkout, pay at cashier: create a WEB-n table
            (None, PaymentMethod::PayAtCashier) => {
                self.submit_virtual(&venue_id, payload, snapshot, from_catalog, now)
                    .await?
            }
            // Catalog checkout already paid digitally: no table anchor
            (None, PaymentMethod::DigitalPayment) => {
                self.submit_untabled(&venue_id, payload, from_catalog, now)
                    .await?
            }
        };

        let intake_id = result
            .intake
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        tracing::info!(
            venue = %venue_id,
            intake = %intake_id,
            table = ?result.table.as_ref().map(|t| &t.name),
            "Checkout accepted"
        );
        Ok(IntakeOutcome {
            intake_id,
            table: result.table.as_ref().map(VenueTable::snapshot),
        })
    }

    /// Field-level validation before anything touches the database
    fn validate(req: &CheckoutRequest) -> AppResult<()> {
        if req.venue_identity.trim().is_empty() {
            return Err(AppError::validation("Venue identity is required")
                .with_detail("field", "storeId"));
        }
        if req.customer.id.trim().is_empty() || req.customer.name.trim().is_empty() {
            return Err(
                AppError::validation("Customer is required").with_detail("field", "customer")
            );
        }
        if req.cart.is_empty() {
            return Err(
                AppError::validation("Cart must contain at least one item")
                    .with_detail("field", "cart"),
            );
        }
        for (i, item) in req.cart.iter().enumerate() {
            if item.store_id.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Cart item {} is missing its tenant",
                    i
                ))
                .with_detail("field", format!("cart[{}].storeId", i)));
            }
            if item.quantity < 1 {
                return Err(AppError::validation(format!(
                    "Cart item {} has a non-positive quantity",
                    i
                ))
                .with_detail("field", format!("cart[{}].quantity", i)));
            }
        }
        Ok(())
    }

    /// Every cart item must reference an enabled tenant of this venue
    async fn check_tenants(&self, venue_id: &RecordId, cart: &[CartItem]) -> AppResult<()> {
        let tenants = TenantRepository::new(self.db.clone());
        let mut seen: Vec<&str> = Vec::new();
        for item in cart {
            if seen.contains(&item.store_id.as_str()) {
                continue;
            }
            seen.push(&item.store_id);

            let tenant = tenants
                .find_by_id(&item.store_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::TenantNotFound,
                        format!("Tenant {} not found", item.store_id),
                    )
                    .with_detail("tenant_id", item.store_id.clone())
                })?;
            if tenant.venue != *venue_id {
                return Err(AppError::validation(format!(
                    "Tenant {} does not operate in this venue",
                    item.store_id
                )));
            }
            if !tenant.pos_enabled {
                return Err(AppError::with_message(
                    ErrorCode::TenantNotEnabled,
                    format!("Tenant {} is not accepting orders", item.store_id),
                ));
            }
        }
        Ok(())
    }

    /// Pay-at-cashier intake batch: counter increment + WEB-n table +
    /// intake record, all-or-nothing
    ///
    /// The counter increment makes concurrent checkouts conflict on
    /// commit; conflicted attempts are retried with fresh counter
    /// reads, so every accepted checkout gets a distinct WEB-n name.
    async fn submit_virtual(
        &self,
        venue_id: &RecordId,
        payload: CheckoutPayload,
        snapshot: CurrentOrderSnapshot,
        from_catalog: bool,
        now: i64,
    ) -> AppResult<IntakeTxnResult> {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            match self
                .run_submit_virtual(venue_id, payload.clone(), snapshot.clone(), from_catalog, now)
                .await
            {
                Err(e) if super::is_retryable_conflict(&e.message) => {
                    if attempt >= super::TXN_MAX_RETRIES {
                        return Err(AppError::with_message(
                            ErrorCode::ConflictRetryExhausted,
                            "Checkout intake kept conflicting with concurrent checkouts",
                        ));
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(10 * attempt)).await;
                }
                other => return other,
            }
        }
    }

    async fn run_submit_virtual(
        &self,
        venue_id: &RecordId,
        payload: CheckoutPayload,
        snapshot: CurrentOrderSnapshot,
        from_catalog: bool,
        now: i64,
    ) -> AppResult<IntakeTxnResult> {
        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $venue = (UPDATE $venue_id SET virtual_table_counter += 1 RETURN AFTER);
                 IF array::len($venue) == 0 { THROW \"VENUE_NOT_FOUND\" };
                 LET $table = (CREATE venue_table CONTENT {
                     venue: $venue_id,
                     name: string::concat('WEB-', <string> $venue[0].virtual_table_counter),
                     status: 'OCCUPIED',
                     capacity: 1,
                     is_virtual: true,
                     current_order: $snapshot
                 });
                 LET $intake = (CREATE intake_queue CONTENT {
                     venue: $venue_id,
                     payload: $payload,
                     table: $table[0].id,
                     from_catalog: $from_catalog,
                     attempts: 0,
                     dead_letter: false,
                     created_at: $now
                 });
                 RETURN { table: $table[0], intake: $intake[0] };
                 COMMIT TRANSACTION;",
            )
            .bind(("venue_id", venue_id.clone()))
            .bind(("snapshot", snapshot))
            .bind(("payload", payload))
            .bind(("from_catalog", from_catalog))
            .bind(("now", now))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        take_txn_result(&mut response)
    }

    /// Table-side intake batch: occupy the physical table + intake
    /// record, all-or-nothing
    async fn submit_with_table(
        &self,
        venue_id: &RecordId,
        table: RecordId,
        payload: CheckoutPayload,
        snapshot: CurrentOrderSnapshot,
        from_catalog: bool,
        now: i64,
    ) -> AppResult<IntakeTxnResult> {
        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $table = (UPDATE $table_id SET status = 'OCCUPIED', current_order = $snapshot RETURN AFTER);
                 IF array::len($table) == 0 { THROW \"TABLE_NOT_FOUND\" };
                 LET $intake = (CREATE intake_queue CONTENT {
                     venue: $venue_id,
                     payload: $payload,
                     table: $table_id,
                     from_catalog: $from_catalog,
                     attempts: 0,
                     dead_letter: false,
                     created_at: $now
                 });
                 RETURN { table: $table[0], intake: $intake[0] };
                 COMMIT TRANSACTION;",
            )
            .bind(("venue_id", venue_id.clone()))
            .bind(("table_id", table.clone()))
            .bind(("snapshot", snapshot))
            .bind(("payload", payload))
            .bind(("from_catalog", from_catalog))
            .bind(("now", now))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        take_txn_result(&mut response).map_err(|e| {
            if e.message.contains("TABLE_NOT_FOUND") {
                AppError::with_message(
                    ErrorCode::TableNotFound,
                    format!("Table {} not found", table),
                )
            } else {
                e
            }
        })
    }

    /// Digitally paid catalog checkout: intake record only
    async fn submit_untabled(
        &self,
        venue_id: &RecordId,
        payload: CheckoutPayload,
        from_catalog: bool,
        now: i64,
    ) -> AppResult<IntakeTxnResult> {
        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $intake = (CREATE intake_queue CONTENT {
                     venue: $venue_id,
                     payload: $payload,
                     table: NONE,
                     from_catalog: $from_catalog,
                     attempts: 0,
                     dead_letter: false,
                     created_at: $now
                 });
                 RETURN { table: NONE, intake: $intake[0] };
                 COMMIT TRANSACTION;",
            )
            .bind(("venue_id", venue_id.clone()))
            .bind(("payload", payload))
            .bind(("from_catalog", from_catalog))
            .bind(("now", now))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        take_txn_result(&mut response)
    }
}

/// Pull the RETURN value out of the intake transaction response
///
/// An aborted transaction reports its THROW marker in the
/// per-statement errors, so those are surfaced before the RETURN slot
/// is read.
fn take_txn_result(response: &mut surrealdb::Response) -> AppResult<IntakeTxnResult> {
    if let Some(msg) = super::transaction_failure(response) {
        return Err(AppError::database(msg));
    }
    let last = response.num_statements().saturating_sub(1);
    let result: Option<IntakeTxnResult> = response
        .take(last)
        .map_err(|e| AppError::database(e.to_string()))?;
    result.ok_or_else(|| AppError::database("Intake transaction returned no result"))
}
