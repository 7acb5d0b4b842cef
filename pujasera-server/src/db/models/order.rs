//! Order Models
//!
//! One checkout produces one [`ParentOrder`] in the venue space and one
//! [`SubOrder`] per involved tenant. The two spaces share a receipt
//! number issued from the venue's sequential counter; `(venue,
//! receipt_number)` and `(tenant, receipt_number)` are unique, so the
//! receipt is the join key across spaces.

use std::collections::BTreeMap;

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::{
    CartItem, CustomerRef, OrderStatus, OrderTotals, PaymentMethod, TenantItemStatus,
};
use surrealdb::RecordId;

/// Parent order - the customer-facing order in the venue space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentOrder {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    pub receipt_number: i64,
    pub customer: CustomerRef,
    /// Full cart across all tenants
    pub items: Vec<CartItem>,
    pub totals: OrderTotals,
    pub status: OrderStatus,
    /// Per-tenant readiness, keyed by tenant record key
    #[serde(default)]
    pub items_status: BTreeMap<String, TenantItemStatus>,
    /// Table anchoring this order (virtual WEB-n or physical)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    pub payment_method: PaymentMethod,
    /// Intake record this order was fanned out from. Unique per order,
    /// which makes fan-out exactly-once at the store level.
    #[serde(with = "serde_helpers::record_id")]
    pub intake: RecordId,
    /// Epoch millis
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

/// Sub-order - one tenant's slice of a checkout, in the tenant space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubOrder {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    /// Same receipt number as the parent order
    pub receipt_number: i64,
    /// Only this tenant's items
    pub items: Vec<CartItem>,
    pub status: OrderStatus,
    /// Epoch millis
    pub created_at: i64,
}
