//! Utility module - common helpers and re-exports
//!
//! - [`AppError`] / [`ApiResponse`] - unified error types (from
//!   `shared::error`)
//! - [`logger`] - tracing setup

pub mod logger;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
