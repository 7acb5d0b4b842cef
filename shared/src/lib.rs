//! Shared types for the Pujasera platform
//!
//! Cross-cutting types used by the venue server and its clients:
//!
//! - **Errors** (`error`): unified error codes, [`AppError`] and the
//!   [`ApiResponse`] envelope
//! - **Orders** (`order`): the kitchen status state machine, cart line
//!   items and checkout value types shared between the intake channel,
//!   the fan-out pipeline and the kitchen views

pub mod error;
pub mod order;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{
    CartItem, CustomerRef, OrderStatus, OrderTotals, PaymentMethod, TableSnapshot,
    TenantItemStatus,
};
