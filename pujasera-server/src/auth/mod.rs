//! Authentication and authorization
//!
//! JWT bearer credentials resolve to a [`CurrentUser`] with a [`Role`].
//! Venue roles (venue-admin, cashier) act on whole parent orders;
//! tenant roles (tenant-admin, kitchen-staff) carry a tenant binding
//! and may only act on their own tenant's sub-orders.

pub mod extractor;
pub mod jwt;
pub mod permissions;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use permissions::{CurrentUser, Role};
