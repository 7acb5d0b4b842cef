//! Tenant Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Tenant stall entity
///
/// Cart items reference tenants by the key part of this record's id,
/// which is also the key used in a parent order's `items_status` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Venue this stall operates in
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    #[serde(default = "default_true")]
    pub pos_enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Create tenant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantCreate {
    pub name: String,
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
}
