//! Order Orchestration
//!
//! The pipeline from accepted checkout to handed-over order:
//!
//! - [`IntakeService`] - validates a checkout and enqueues it, creating
//!   the WEB-n virtual table for pay-at-cashier orders
//! - [`IntakeWorker`] - drains the queue in the background
//! - [`FanOutService`] - expands one intake record into one parent
//!   order plus per-tenant sub-orders, exactly once
//! - [`OrderOrchestrator`] - the cross-document status transitions
//! - [`KitchenViewBuilder`] - per-stall projections for kitchen screens

pub mod fan_out;
pub mod intake;
pub mod kitchen_view;
pub mod orchestrator;
pub mod worker;

pub use fan_out::{FanOutError, FanOutService};
pub use intake::{CheckoutRequest, IntakeOutcome, IntakeService};
pub use kitchen_view::{KitchenViewBuilder, OrderSlice};
pub use orchestrator::{FinalizeOutcome, OrderOrchestrator};
pub use worker::IntakeWorker;

/// Attempts before a counter transaction gives up on commit conflicts
pub(crate) const TXN_MAX_RETRIES: u64 = 10;

/// Statement errors of an aborted transaction, joined into one message
///
/// When a statement THROWs, the SDK attaches the marker to that
/// statement's slot and reports every other slot as a generic
/// transaction failure; `take()` on the RETURN slot only ever sees the
/// generic text. The marker has to come from the per-statement errors.
pub(crate) fn transaction_failure(response: &mut surrealdb::Response) -> Option<String> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return None;
    }
    let mut parts: Vec<(usize, String)> = errors
        .into_iter()
        .map(|(index, error)| (index, error.to_string()))
        .collect();
    parts.sort_by_key(|(index, _)| *index);
    Some(
        parts
            .into_iter()
            .map(|(_, message)| message)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Commit conflicts between concurrent transactions on the same hot
/// document (the venue counters) are transient and worth a retry
pub(crate) fn is_retryable_conflict(message: &str) -> bool {
    message.contains("read or write conflict") || message.contains("can be retried")
}
