//! Kitchen status state machine
//!
//! One shared enum for both parent orders and sub-orders:
//! `Processing → ReadyForPickup → Completed`, with `Cancelled` as a
//! separate absorbing state reachable from `Processing`.
//! `CompletedPaid` and `Unpaid` are payment-reconciliation sub-states
//! of `Completed` carried on the wire but never produced by the kitchen
//! flow itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status shared by parent orders and sub-orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Processing,
    ReadyForPickup,
    Completed,
    CompletedPaid,
    Unpaid,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states: no further kitchen transitions are allowed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CompletedPaid | Self::Cancelled
        )
    }

    /// Active states: the order appears on kitchen views
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing | Self::ReadyForPickup)
    }

    /// Whether a venue actor may complete an order in this state.
    ///
    /// Completion is allowed from any non-terminal status, even when
    /// some tenants have not marked their slice ready. This is an
    /// intentional operational shortcut ("whole order handed over"),
    /// not a bug.
    pub fn can_complete(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether a venue actor may cancel an order in this state
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "PROCESSING",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::Completed => "COMPLETED",
            Self::CompletedPaid => "COMPLETED_PAID",
            Self::Unpaid => "UNPAID",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Per-tenant slice status stored in the parent order's `items_status`
/// map.
///
/// A sub-order's terminal observable state is `ReadyForPickup`;
/// "completed" is a venue-level concept, so this enum deliberately has
/// only two variants. The map entry for a tenant exists iff that
/// tenant contributed at least one line item to the order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantItemStatus {
    Processing,
    ReadyForPickup,
}

impl From<TenantItemStatus> for OrderStatus {
    fn from(status: TenantItemStatus) -> Self {
        match status {
            TenantItemStatus::Processing => OrderStatus::Processing,
            TenantItemStatus::ReadyForPickup => OrderStatus::ReadyForPickup,
        }
    }
}

impl fmt::Display for TenantItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "PROCESSING",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
        };
        write!(f, "{}", s)
    }
}
