//! Venue Model
//!
//! A venue is one food court: the shared space that owns tables,
//! parent orders and the per-venue counters. The `virtual_table_counter`
//! names WEB-n tables; the `receipt_counter` issues the sequential
//! receipt numbers that join parent and sub-orders. Both only ever move
//! forward and are only incremented inside transactions.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Venue entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Stable public identifier used by checkout clients
    pub group_slug: String,
    #[serde(default)]
    pub virtual_table_counter: i64,
    #[serde(default)]
    pub receipt_counter: i64,
    /// Tenant stalls operating in this venue
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub tenants: Vec<RecordId>,
}

/// Create venue payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueCreate {
    pub name: String,
    pub group_slug: String,
}
