//! Database Models
//!
//! Storage documents for the embedded SurrealDB store.

pub mod serde_helpers;

pub mod intake;
pub mod order;
pub mod tenant;
pub mod venue;
pub mod venue_table;

pub use intake::{CheckoutPayload, IntakeRecord};
pub use order::{ParentOrder, SubOrder};
pub use tenant::{Tenant, TenantCreate};
pub use venue::{Venue, VenueCreate};
pub use venue_table::{VenueTable, VenueTableCreate};
