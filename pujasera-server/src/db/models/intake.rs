//! Intake Queue Model
//!
//! The intake endpoint enqueues one record per accepted checkout; the
//! worker drains the queue through the fan-out pipeline. A record that
//! keeps failing is parked as dead-letter instead of blocking the queue.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::{CartItem, CustomerRef, OrderTotals, PaymentMethod};
use surrealdb::RecordId;

/// The checkout as the customer submitted it, stored verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutPayload {
    pub customer: CustomerRef,
    pub cart: Vec<CartItem>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
}

/// Queued intake record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    pub payload: CheckoutPayload,
    /// Table assigned at intake time (WEB-n, or the physical table the
    /// customer ordered from)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    /// True when the checkout came from the public catalog rather than
    /// a table-side channel
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub from_catalog: bool,
    #[serde(default)]
    pub attempts: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub dead_letter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Epoch millis
    pub created_at: i64,
}
