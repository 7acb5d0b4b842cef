//! Cart, checkout and table value types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer pays for a checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Customer pays at the cashier counter; a virtual table anchors
    /// the order until it is handed over
    PayAtCashier,
    /// Customer already paid through a digital channel
    DigitalPayment,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PayAtCashier => "PAY_AT_CASHIER",
            Self::DigitalPayment => "DIGITAL_PAYMENT",
        };
        write!(f, "{}", s)
    }
}

/// One cart line item, tagged with the tenant stall it originates from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Originating tenant key (the partition key for fan-out)
    pub store_id: String,
    /// Originating tenant display name (denormalized for receipts and
    /// kitchen views)
    pub store_name: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CartItem {
    /// Line total (price × quantity)
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Aggregate totals computed by the checkout channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub service_fee_amount: f64,
    pub total_amount: f64,
}

/// Reference to the customer placing the order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Table status lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    AwaitingCleanup,
}

/// Snapshot of the order a table is currently anchoring
///
/// Mirrors the cart at checkout time so the cashier dashboard can show
/// the order without a join against the order documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOrderSnapshot {
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub customer: CustomerRef,
    pub payment_method: PaymentMethod,
    pub order_time: DateTime<Utc>,
}

/// Table view returned to the intake channel and the cashier dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    pub capacity: i32,
    pub is_virtual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order: Option<CurrentOrderSnapshot>,
}
