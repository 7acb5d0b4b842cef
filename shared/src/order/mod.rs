//! Shared order types
//!
//! The kitchen status state machine and the value types that travel
//! between the customer-facing intake channel, the fan-out pipeline and
//! the kitchen views. Storage documents in the server wrap these types;
//! clients deserialize them directly.

mod status;
mod types;

pub use status::{OrderStatus, TenantItemStatus};
pub use types::{
    CartItem, CurrentOrderSnapshot, CustomerRef, OrderTotals, PaymentMethod, TableSnapshot,
    TableStatus,
};
