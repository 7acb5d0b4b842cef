//! Venue Table Model
//!
//! Physical tables are provisioned by the venue admin. Virtual tables
//! (WEB-n) are created by the intake endpoint for pay-at-cashier
//! checkouts and deleted when the order completes.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::{CurrentOrderSnapshot, TableSnapshot, TableStatus};
use surrealdb::RecordId;

/// Venue table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    pub name: String,
    pub status: TableStatus,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_virtual: bool,
    /// Cart snapshot of the order this table is anchoring, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order: Option<CurrentOrderSnapshot>,
}

fn default_capacity() -> i32 {
    4
}

impl VenueTable {
    /// Client-facing view of this table
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            id: self
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: self.name.clone(),
            status: self.status,
            capacity: self.capacity,
            is_virtual: self.is_virtual,
            current_order: self.current_order.clone(),
        }
    }
}

/// Create physical table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueTableCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    pub name: String,
    pub capacity: Option<i32>,
}
