//! End-to-end order flow against an in-memory database
//!
//! Exercises the full pipeline: checkout intake (virtual table +
//! queue), fan-out into parent and sub-orders, the cross-document
//! status transitions, table lifecycle on completion, and the kitchen
//! views.

use std::sync::Arc;

use pujasera_server::auth::{JwtConfig, JwtService};
use pujasera_server::core::{Config, ServerState};
use pujasera_server::db::DbService;
use pujasera_server::db::models::{TenantCreate, VenueCreate, VenueTableCreate};
use pujasera_server::db::repository::{
    IntakeRepository, ParentOrderRepository, SubOrderRepository, TenantRepository,
    VenueRepository, VenueTableRepository,
};
use pujasera_server::notify::LogNotifier;
use pujasera_server::orders::{
    CheckoutRequest, FanOutError, FanOutService, IntakeService, IntakeWorker, KitchenViewBuilder,
    OrderOrchestrator,
};
use shared::error::ErrorCode;
use shared::order::{
    CartItem, CustomerRef, OrderStatus, OrderTotals, PaymentMethod, TableStatus, TenantItemStatus,
};

struct TestContext {
    state: ServerState,
    venue_id: String,
    _work_dir: tempfile::TempDir,
}

async fn setup() -> TestContext {
    setup_with_max_attempts(1).await
}

async fn setup_with_max_attempts(fan_out_max_attempts: u32) -> TestContext {
    let work_dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    config.fan_out_max_attempts = fan_out_max_attempts;

    let db_service = DbService::new_memory().await.expect("in-memory db");
    let state = ServerState::new(
        config,
        db_service.db,
        Arc::new(JwtService::new(JwtConfig::default())),
        Arc::new(LogNotifier),
    );

    let venues = VenueRepository::new(state.get_db());
    let venue = venues
        .create(VenueCreate {
            name: "Pujasera Merdeka".into(),
            group_slug: "merdeka".into(),
        })
        .await
        .expect("create venue");
    let venue_id = venue.id.expect("venue id").to_string();

    let tenants = TenantRepository::new(state.get_db());
    for key in ["warung_a", "warung_b"] {
        let tenant = tenants
            .create(
                key,
                TenantCreate {
                    name: format!("Warung {}", key.chars().last().unwrap().to_uppercase()),
                    venue: venue_id.parse().unwrap(),
                },
            )
            .await
            .expect("create tenant");
        venues
            .add_tenant(&venue_id, &tenant.id.unwrap().to_string())
            .await
            .expect("register tenant");
    }

    TestContext {
        state,
        venue_id,
        _work_dir: work_dir,
    }
}

fn item(store: &str, product: &str, price: f64, qty: i32) -> CartItem {
    CartItem {
        store_id: store.into(),
        store_name: format!("Warung {}", store),
        product_id: product.into(),
        name: product.into(),
        price,
        quantity: qty,
        note: None,
    }
}

fn checkout(venue: &str, cart: Vec<CartItem>, payment: PaymentMethod) -> CheckoutRequest {
    let subtotal: f64 = cart.iter().map(CartItem::line_total).sum();
    CheckoutRequest {
        venue_identity: venue.into(),
        customer: CustomerRef {
            id: "cust1".into(),
            name: "Budi".into(),
            contact: Some("+628120000001".into()),
        },
        cart,
        totals: OrderTotals {
            subtotal,
            total_amount: subtotal,
            ..Default::default()
        },
        payment_method: payment,
        table_id: None,
    }
}

fn two_stall_cart() -> Vec<CartItem> {
    vec![
        item("warung_a", "sate_ayam", 25000.0, 2),
        item("warung_b", "es_teh", 5000.0, 1),
        item("warung_a", "lontong", 8000.0, 1),
    ]
}

// ===== Intake =====

#[tokio::test]
async fn test_intake_creates_virtual_table_and_enqueues() {
    let ctx = setup().await;
    let intake = IntakeService::new(ctx.state.get_db());

    let outcome = intake
        .submit(checkout(&ctx.venue_id, two_stall_cart(), PaymentMethod::PayAtCashier))
        .await
        .expect("intake");

    let table = outcome.table.expect("virtual table assigned");
    assert_eq!(table.name, "WEB-1");
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.capacity, 1);
    assert!(table.is_virtual);
    let snapshot = table.current_order.expect("order snapshot on table");
    assert_eq!(snapshot.items.len(), 3);
    assert_eq!(snapshot.customer.name, "Budi");

    let venue = VenueRepository::new(ctx.state.get_db())
        .find_by_id(&ctx.venue_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.virtual_table_counter, 1);

    let pending = IntakeRepository::new(ctx.state.get_db())
        .next_pending()
        .await
        .unwrap()
        .expect("queued intake record");
    assert_eq!(pending.payload.cart.len(), 3);
    assert!(pending.from_catalog);
    assert!(!pending.dead_letter);
}

#[tokio::test]
async fn test_intake_virtual_table_names_are_sequential() {
    let ctx = setup().await;
    let intake = IntakeService::new(ctx.state.get_db());

    for expected in ["WEB-1", "WEB-2", "WEB-3"] {
        let outcome = intake
            .submit(checkout(
                &ctx.venue_id,
                vec![item("warung_a", "sate_ayam", 25000.0, 1)],
                PaymentMethod::PayAtCashier,
            ))
            .await
            .expect("intake");
        assert_eq!(outcome.table.unwrap().name, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_get_distinct_tables_and_receipts() {
    const CHECKOUTS: usize = 16;
    let ctx = setup().await;

    let mut handles = Vec::with_capacity(CHECKOUTS);
    for _ in 0..CHECKOUTS {
        let db = ctx.state.get_db();
        let venue = ctx.venue_id.clone();
        handles.push(tokio::spawn(async move {
            IntakeService::new(db)
                .submit(checkout(
                    &venue,
                    vec![item("warung_a", "sate_ayam", 25000.0, 1)],
                    PaymentMethod::PayAtCashier,
                ))
                .await
        }));
    }

    // Every checkout got its own WEB-n table, no name handed out twice
    let mut names = std::collections::HashSet::new();
    for handle in handles {
        let outcome = handle.await.unwrap().expect("concurrent checkout");
        let table = outcome.table.expect("virtual table assigned");
        assert!(names.insert(table.name.clone()), "duplicate table {}", table.name);
    }
    for n in 1..=CHECKOUTS {
        assert!(names.contains(&format!("WEB-{}", n)));
    }
    let venue = VenueRepository::new(ctx.state.get_db())
        .find_by_id(&ctx.venue_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.virtual_table_counter, CHECKOUTS as i64);

    // Fan-out stamps every order with its own receipt number
    let worker = IntakeWorker::new(ctx.state.clone());
    assert_eq!(worker.drain().await.unwrap(), CHECKOUTS);
    let orders = ParentOrderRepository::new(ctx.state.get_db())
        .find_active_by_venue(&ctx.venue_id)
        .await
        .unwrap();
    let receipts: std::collections::HashSet<i64> =
        orders.iter().map(|o| o.receipt_number).collect();
    assert_eq!(orders.len(), CHECKOUTS);
    assert_eq!(receipts.len(), CHECKOUTS);
    assert_eq!(receipts.iter().max(), Some(&(CHECKOUTS as i64)));
}

#[tokio::test]
async fn test_intake_digital_payment_gets_no_table() {
    let ctx = setup().await;
    let outcome = IntakeService::new(ctx.state.get_db())
        .submit(checkout(&ctx.venue_id, two_stall_cart(), PaymentMethod::DigitalPayment))
        .await
        .expect("intake");
    assert!(outcome.table.is_none());

    let venue = VenueRepository::new(ctx.state.get_db())
        .find_by_id(&ctx.venue_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.virtual_table_counter, 0);
}

#[tokio::test]
async fn test_intake_rejects_empty_cart() {
    let ctx = setup().await;
    let err = IntakeService::new(ctx.state.get_db())
        .submit(checkout(&ctx.venue_id, vec![], PaymentMethod::PayAtCashier))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    // Nothing was enqueued and no table was created
    assert!(
        IntakeRepository::new(ctx.state.get_db())
            .next_pending()
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        VenueTableRepository::new(ctx.state.get_db())
            .find_by_venue(&ctx.venue_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_intake_rejects_unknown_venue() {
    let ctx = setup().await;
    let err = IntakeService::new(ctx.state.get_db())
        .submit(checkout("venue:nonexistent", two_stall_cart(), PaymentMethod::PayAtCashier))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::VenueNotFound);
}

#[tokio::test]
async fn test_intake_rejects_unknown_tenant() {
    let ctx = setup().await;
    let err = IntakeService::new(ctx.state.get_db())
        .submit(checkout(
            &ctx.venue_id,
            vec![item("warung_z", "bakso", 12000.0, 1)],
            PaymentMethod::PayAtCashier,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TenantNotFound);
}

// ===== Fan-out =====

async fn submit_and_fan_out(ctx: &TestContext, cart: Vec<CartItem>) -> i64 {
    IntakeService::new(ctx.state.get_db())
        .submit(checkout(&ctx.venue_id, cart, PaymentMethod::PayAtCashier))
        .await
        .expect("intake");
    let record = IntakeRepository::new(ctx.state.get_db())
        .next_pending()
        .await
        .unwrap()
        .expect("queued record");
    FanOutService::new(ctx.state.get_db())
        .fan_out(&record)
        .await
        .expect("fan out")
}

#[tokio::test]
async fn test_fan_out_creates_parent_and_sub_orders() {
    let ctx = setup().await;
    let receipt = submit_and_fan_out(&ctx, two_stall_cart()).await;
    assert_eq!(receipt, 1);

    let parent = ParentOrderRepository::new(ctx.state.get_db())
        .get_by_receipt(&ctx.venue_id, receipt)
        .await
        .expect("parent order");
    assert_eq!(parent.status, OrderStatus::Processing);
    assert_eq!(parent.items.len(), 3);
    assert_eq!(parent.items_status.len(), 2);
    assert!(
        parent
            .items_status
            .values()
            .all(|s| *s == TenantItemStatus::Processing)
    );
    assert!(parent.table.is_some());

    let subs = SubOrderRepository::new(ctx.state.get_db());
    let sub_a = subs
        .find_by_receipt("warung_a", receipt)
        .await
        .unwrap()
        .expect("sub-order a");
    assert_eq!(sub_a.items.len(), 2);
    assert_eq!(sub_a.status, OrderStatus::Processing);
    let sub_b = subs
        .find_by_receipt("warung_b", receipt)
        .await
        .unwrap()
        .expect("sub-order b");
    assert_eq!(sub_b.items.len(), 1);

    // The intake record was consumed inside the same transaction
    assert!(
        IntakeRepository::new(ctx.state.get_db())
            .next_pending()
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_fan_out_is_exactly_once() {
    let ctx = setup().await;
    IntakeService::new(ctx.state.get_db())
        .submit(checkout(&ctx.venue_id, two_stall_cart(), PaymentMethod::PayAtCashier))
        .await
        .unwrap();
    let record = IntakeRepository::new(ctx.state.get_db())
        .next_pending()
        .await
        .unwrap()
        .unwrap();

    let fan_out = FanOutService::new(ctx.state.get_db());
    let receipt = fan_out.fan_out(&record).await.expect("first fan out");

    // Replaying the same record aborts before writing anything
    let err = fan_out.fan_out(&record).await.unwrap_err();
    assert!(matches!(err, FanOutError::AlreadyFannedOut));

    let venue = VenueRepository::new(ctx.state.get_db())
        .find_by_id(&ctx.venue_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.receipt_counter, receipt);

    let active = ParentOrderRepository::new(ctx.state.get_db())
        .find_active_by_venue(&ctx.venue_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn test_receipt_numbers_are_sequential_across_orders() {
    let ctx = setup().await;
    let first = submit_and_fan_out(&ctx, vec![item("warung_a", "sate_ayam", 25000.0, 1)]).await;
    let second = submit_and_fan_out(&ctx, vec![item("warung_b", "es_teh", 5000.0, 2)]).await;
    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

/// Raw intake record pointing at a venue that does not exist, queued
/// ahead of everything else (created_at = 1); fan-out can never
/// succeed on it
async fn enqueue_ghost_venue_record(ctx: &TestContext) {
    ctx.state
        .get_db()
        .query(
            "CREATE intake_queue CONTENT {
                 venue: $venue,
                 payload: {
                     customer: { id: 'c1', name: 'Budi' },
                     cart: [{ storeId: 'warung_a', storeName: 'Warung A', productId: 'p', name: 'p', price: 1000.0, quantity: 1 }],
                     totals: { subtotal: 1000.0, discountAmount: 0.0, taxAmount: 0.0, serviceFeeAmount: 0.0, totalAmount: 1000.0 },
                     payment_method: 'PAY_AT_CASHIER'
                 },
                 table: NONE,
                 from_catalog: true,
                 attempts: 0,
                 dead_letter: false,
                 created_at: 1
             }",
        )
        .bind(("venue", surrealdb::RecordId::from_table_key("venue", "ghost")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_worker_dead_letters_broken_record() {
    let ctx = setup().await;
    // One failed attempt (max_attempts = 1) parks the record
    enqueue_ghost_venue_record(&ctx).await;

    let worker = IntakeWorker::new(ctx.state.clone());
    worker.drain().await.expect("drain");

    let dead = IntakeRepository::new(ctx.state.get_db())
        .find_dead_letter("venue:ghost")
        .await
        .unwrap();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].attempts, 1);
    assert!(dead[0].last_error.is_some());
}

#[tokio::test]
async fn test_worker_passes_over_failing_record() {
    // max_attempts = 3 keeps the broken record retryable, so it stays
    // at the head of the queue for the whole pass
    let ctx = setup_with_max_attempts(3).await;
    enqueue_ghost_venue_record(&ctx).await;
    IntakeService::new(ctx.state.get_db())
        .submit(checkout(
            &ctx.venue_id,
            vec![item("warung_a", "sate_ayam", 25000.0, 1)],
            PaymentMethod::PayAtCashier,
        ))
        .await
        .expect("intake");

    let worker = IntakeWorker::new(ctx.state.clone());
    assert_eq!(worker.drain().await.unwrap(), 2);

    // The healthy order behind the broken record fanned out
    let parent = ParentOrderRepository::new(ctx.state.get_db())
        .get_by_receipt(&ctx.venue_id, 1)
        .await
        .expect("parent order");
    assert_eq!(parent.status, OrderStatus::Processing);

    // The broken record was attempted once and is still retryable
    let pending = IntakeRepository::new(ctx.state.get_db())
        .next_pending()
        .await
        .unwrap()
        .expect("broken record still queued");
    assert_eq!(pending.attempts, 1);
    assert!(!pending.dead_letter);
}

#[tokio::test]
async fn test_worker_drops_replayed_record_as_duplicate() {
    let ctx = setup().await;
    let db = ctx.state.get_db();

    // Fixed record key so the replay carries the same intake identity
    let create = "CREATE intake_queue:replay CONTENT {
                      venue: $venue,
                      payload: {
                          customer: { id: 'c1', name: 'Budi' },
                          cart: [{ storeId: 'warung_a', storeName: 'Warung A', productId: 'p', name: 'p', price: 1000.0, quantity: 1 }],
                          totals: { subtotal: 1000.0, discountAmount: 0.0, taxAmount: 0.0, serviceFeeAmount: 0.0, totalAmount: 1000.0 },
                          payment_method: 'PAY_AT_CASHIER'
                      },
                      table: NONE,
                      from_catalog: true,
                      attempts: 0,
                      dead_letter: false,
                      created_at: 1
                  }";
    let venue: surrealdb::RecordId = ctx.venue_id.parse().unwrap();
    db.query(create).bind(("venue", venue.clone())).await.unwrap();

    let worker = IntakeWorker::new(ctx.state.clone());
    assert_eq!(worker.drain().await.unwrap(), 1);

    // The same record reappears after the order was already expanded,
    // as an at-least-once queue may deliver
    db.query(create).bind(("venue", venue)).await.unwrap();
    assert_eq!(worker.drain().await.unwrap(), 1);

    // Dropped as a duplicate: no second order, nothing dead-lettered
    let active = ParentOrderRepository::new(ctx.state.get_db())
        .find_active_by_venue(&ctx.venue_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    let intakes = IntakeRepository::new(ctx.state.get_db());
    assert!(intakes.next_pending().await.unwrap().is_none());
    assert!(intakes.find_dead_letter(&ctx.venue_id).await.unwrap().is_empty());
}

// ===== Status transitions =====

#[tokio::test]
async fn test_mark_ready_updates_sub_order_and_parent_together() {
    let ctx = setup().await;
    let receipt = submit_and_fan_out(&ctx, two_stall_cart()).await;
    let orchestrator = OrderOrchestrator::new(ctx.state.get_db());

    let parent = orchestrator
        .mark_ready(&ctx.venue_id, "warung_a", receipt)
        .await
        .expect("mark ready");
    assert_eq!(
        parent.items_status["warung_a"],
        TenantItemStatus::ReadyForPickup
    );
    assert_eq!(parent.items_status["warung_b"], TenantItemStatus::Processing);

    let sub = SubOrderRepository::new(ctx.state.get_db())
        .find_by_receipt("warung_a", receipt)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sub.status, OrderStatus::ReadyForPickup);

    // Re-marking an already-ready slice is a no-op success
    orchestrator
        .mark_ready(&ctx.venue_id, "warung_a", receipt)
        .await
        .expect("idempotent re-mark");
}

#[tokio::test]
async fn test_mark_ready_unknown_receipt_names_both_identities() {
    let ctx = setup().await;
    let err = OrderOrchestrator::new(ctx.state.get_db())
        .mark_ready(&ctx.venue_id, "warung_a", 404)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SubOrderNotFound);
    assert!(err.message.contains("warung_a"));
    assert!(err.message.contains("404"));
    let details = err.details.expect("details");
    assert_eq!(details.get("receipt_number").unwrap(), 404);
}

#[tokio::test]
async fn test_mark_ready_rolls_back_when_parent_is_missing() {
    let ctx = setup().await;
    // A sub-order with no parent: the parent update must fail and the
    // sub-order update must roll back with it
    ctx.state
        .get_db()
        .query(
            "CREATE sub_order CONTENT {
                 tenant: $tenant,
                 venue: $venue,
                 receipt_number: 99,
                 items: [],
                 status: 'PROCESSING',
                 created_at: 1
             }",
        )
        .bind(("tenant", surrealdb::RecordId::from_table_key("tenant", "warung_a")))
        .bind(("venue", ctx.venue_id.parse::<surrealdb::RecordId>().unwrap()))
        .await
        .unwrap();

    let err = OrderOrchestrator::new(ctx.state.get_db())
        .mark_ready(&ctx.venue_id, "warung_a", 99)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    let sub = SubOrderRepository::new(ctx.state.get_db())
        .find_by_receipt("warung_a", 99)
        .await
        .unwrap()
        .expect("orphan sub-order still present");
    assert_eq!(sub.status, OrderStatus::Processing, "sub-order update must roll back");
}

#[tokio::test]
async fn test_complete_releases_virtual_table() {
    let ctx = setup().await;
    let receipt = submit_and_fan_out(&ctx, two_stall_cart()).await;
    let orchestrator = OrderOrchestrator::new(ctx.state.get_db());

    let outcome = orchestrator
        .complete(&ctx.venue_id, receipt)
        .await
        .expect("complete");
    assert_eq!(outcome.order.status, OrderStatus::Completed);
    assert!(outcome.order.completed_at.is_some());
    assert_eq!(outcome.released_table.as_deref(), Some("WEB-1"));

    // Virtual tables are deleted outright
    assert!(
        VenueTableRepository::new(ctx.state.get_db())
            .find_by_venue(&ctx.venue_id)
            .await
            .unwrap()
            .is_empty()
    );

    // Completion cascades to the sub-orders
    for tenant in ["warung_a", "warung_b"] {
        let sub = SubOrderRepository::new(ctx.state.get_db())
            .find_by_receipt(tenant, receipt)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.status, OrderStatus::Completed);
    }

    // Completing again is a conflict
    let err = orchestrator.complete(&ctx.venue_id, receipt).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);
}

#[tokio::test]
async fn test_complete_physical_table_goes_to_cleanup() {
    let ctx = setup().await;
    let table = VenueTableRepository::new(ctx.state.get_db())
        .create_physical(VenueTableCreate {
            venue: ctx.venue_id.parse().unwrap(),
            name: "T-05".into(),
            capacity: Some(4),
        })
        .await
        .expect("physical table");
    let table_id = table.id.unwrap().to_string();

    let mut request = checkout(
        &ctx.venue_id,
        vec![item("warung_a", "sate_ayam", 25000.0, 1)],
        PaymentMethod::PayAtCashier,
    );
    request.table_id = Some(table_id.clone());
    IntakeService::new(ctx.state.get_db())
        .submit(request)
        .await
        .expect("table-side intake");
    let record = IntakeRepository::new(ctx.state.get_db())
        .next_pending()
        .await
        .unwrap()
        .unwrap();
    assert!(!record.from_catalog);
    let receipt = FanOutService::new(ctx.state.get_db())
        .fan_out(&record)
        .await
        .unwrap();

    OrderOrchestrator::new(ctx.state.get_db())
        .complete(&ctx.venue_id, receipt)
        .await
        .expect("complete");

    let table = VenueTableRepository::new(ctx.state.get_db())
        .find_by_id(&table_id)
        .await
        .unwrap()
        .expect("physical table survives completion");
    assert_eq!(table.status, TableStatus::AwaitingCleanup);
    assert!(table.current_order.is_none());
}

#[tokio::test]
async fn test_cancel_only_while_processing() {
    let ctx = setup().await;
    let orchestrator = OrderOrchestrator::new(ctx.state.get_db());

    let first = submit_and_fan_out(&ctx, two_stall_cart()).await;
    let outcome = orchestrator
        .cancel(&ctx.venue_id, first)
        .await
        .expect("cancel");
    assert_eq!(outcome.order.status, OrderStatus::Cancelled);
    let sub = SubOrderRepository::new(ctx.state.get_db())
        .find_by_receipt("warung_a", first)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sub.status, OrderStatus::Cancelled);

    // Cancelling again is a conflict
    let err = orchestrator.cancel(&ctx.venue_id, first).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);

    // A completed order can no longer be cancelled
    let second = submit_and_fan_out(&ctx, vec![item("warung_b", "es_teh", 5000.0, 1)]).await;
    orchestrator.complete(&ctx.venue_id, second).await.unwrap();
    let err = orchestrator.cancel(&ctx.venue_id, second).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);

    // A cancelled slice cannot be marked ready
    let err = OrderOrchestrator::new(ctx.state.get_db())
        .mark_ready(&ctx.venue_id, "warung_a", first)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
}

// ===== Kitchen views =====

#[tokio::test]
async fn test_kitchen_views_fifo_and_scoped() {
    let ctx = setup().await;
    let first = submit_and_fan_out(&ctx, two_stall_cart()).await;
    let second = submit_and_fan_out(&ctx, vec![item("warung_a", "nasi_goreng", 20000.0, 1)]).await;

    let views = KitchenViewBuilder::new(ctx.state.get_db());

    // Venue view: 2 slices for the first order, 1 for the second, FIFO
    let venue_slices = views.venue_view(&ctx.venue_id).await.unwrap();
    assert_eq!(venue_slices.len(), 3);
    assert_eq!(venue_slices[0].receipt_number, first);
    assert_eq!(venue_slices[1].receipt_number, first);
    assert_eq!(venue_slices[2].receipt_number, second);
    assert!(venue_slices[0].customer.is_some());

    // Tenant view: warung_b only sees its own single slice
    let tenant_slices = views.tenant_view("warung_b").await.unwrap();
    assert_eq!(tenant_slices.len(), 1);
    assert_eq!(tenant_slices[0].receipt_number, first);
    assert_eq!(tenant_slices[0].items.len(), 1);
    assert!(tenant_slices[0].customer.is_none());

    // Completed orders drop off both views
    OrderOrchestrator::new(ctx.state.get_db())
        .complete(&ctx.venue_id, first)
        .await
        .unwrap();
    assert_eq!(views.venue_view(&ctx.venue_id).await.unwrap().len(), 1);
    assert!(views.tenant_view("warung_b").await.unwrap().is_empty());
}

// ===== Full scenario =====

#[tokio::test]
async fn test_full_checkout_to_handover_flow() {
    let ctx = setup().await;

    // Customer checks out items from both stalls, paying at the cashier
    let outcome = IntakeService::new(ctx.state.get_db())
        .submit(checkout(&ctx.venue_id, two_stall_cart(), PaymentMethod::PayAtCashier))
        .await
        .expect("checkout accepted");
    assert_eq!(outcome.table.as_ref().unwrap().name, "WEB-1");

    // Worker drains the queue
    let worker = IntakeWorker::new(ctx.state.clone());
    assert_eq!(worker.drain().await.unwrap(), 1);

    let receipt = 1;
    let orchestrator = OrderOrchestrator::new(ctx.state.get_db());

    // Both stalls finish preparing
    orchestrator
        .mark_ready(&ctx.venue_id, "warung_a", receipt)
        .await
        .unwrap();
    let parent = orchestrator
        .mark_ready(&ctx.venue_id, "warung_b", receipt)
        .await
        .unwrap();
    assert!(
        parent
            .items_status
            .values()
            .all(|s| *s == TenantItemStatus::ReadyForPickup)
    );

    // Cashier hands the order over
    let outcome = orchestrator
        .complete(&ctx.venue_id, receipt)
        .await
        .unwrap();
    assert_eq!(outcome.order.status, OrderStatus::Completed);
    assert_eq!(outcome.released_table.as_deref(), Some("WEB-1"));

    // Everything is settled: no tables, no active orders, empty queue
    assert!(
        VenueTableRepository::new(ctx.state.get_db())
            .find_by_venue(&ctx.venue_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        ParentOrderRepository::new(ctx.state.get_db())
            .find_active_by_venue(&ctx.venue_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        IntakeRepository::new(ctx.state.get_db())
            .next_pending()
            .await
            .unwrap()
            .is_none()
    );
}
