//! Unified error codes for the Pujasera platform
//!
//! This module defines all error codes used across the venue server and
//! its clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Venue / tenant errors
//! - 4xxx: Order errors
//! - 5xxx: Intake errors
//! - 6xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Tenant-scoped caller acting outside its own tenant
    TenantMismatch = 2003,

    // ==================== 3xxx: Venue / Tenant ====================
    /// Venue not found
    VenueNotFound = 3001,
    /// Tenant not found
    TenantNotFound = 3002,
    /// Tenant exists but POS is not enabled for it
    TenantNotEnabled = 3003,

    // ==================== 4xxx: Order ====================
    /// Parent order not found
    OrderNotFound = 4001,
    /// Sub-order not found for the given (tenant, receipt) pair
    SubOrderNotFound = 4002,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Cart contains no line items
    OrderEmpty = 4005,
    /// Intake record was already fanned out
    DuplicateFanOut = 4006,
    /// Requested status transition is not allowed
    InvalidStatusTransition = 4007,

    // ==================== 5xxx: Intake ====================
    /// Intake record not found
    IntakeNotFound = 5001,
    /// Intake record has been dead-lettered
    IntakeDeadLettered = 5002,
    /// Payment method missing or not recognized
    PaymentMethodInvalid = 5003,

    // ==================== 6xxx: Table ====================
    /// Table not found
    TableNotFound = 6001,
    /// Table is not available for seating
    TableNotAvailable = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Concurrent transaction retries exhausted
    ConflictRetryExhausted = 9003,
    /// Document store unavailable
    DependencyUnavailable = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",

            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role required",
            Self::TenantMismatch => "Caller may only act on its own tenant",

            Self::VenueNotFound => "Venue not found",
            Self::TenantNotFound => "Tenant not found",
            Self::TenantNotEnabled => "Tenant POS is not enabled",

            Self::OrderNotFound => "Order not found",
            Self::SubOrderNotFound => "Sub-order not found",
            Self::OrderAlreadyCompleted => "Order already completed",
            Self::OrderAlreadyCancelled => "Order already cancelled",
            Self::OrderEmpty => "Cart is empty",
            Self::DuplicateFanOut => "Intake record already fanned out",
            Self::InvalidStatusTransition => "Status transition not allowed",

            Self::IntakeNotFound => "Intake record not found",
            Self::IntakeDeadLettered => "Intake record dead-lettered",
            Self::PaymentMethodInvalid => "Payment method missing or invalid",

            Self::TableNotFound => "Table not found",
            Self::TableNotAvailable => "Table not available",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConflictRetryExhausted => "Concurrent update conflict, please retry",
            Self::DependencyUnavailable => "Document store unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,

            2001 => Self::PermissionDenied,
            2002 => Self::RoleRequired,
            2003 => Self::TenantMismatch,

            3001 => Self::VenueNotFound,
            3002 => Self::TenantNotFound,
            3003 => Self::TenantNotEnabled,

            4001 => Self::OrderNotFound,
            4002 => Self::SubOrderNotFound,
            4003 => Self::OrderAlreadyCompleted,
            4004 => Self::OrderAlreadyCancelled,
            4005 => Self::OrderEmpty,
            4006 => Self::DuplicateFanOut,
            4007 => Self::InvalidStatusTransition,

            5001 => Self::IntakeNotFound,
            5002 => Self::IntakeDeadLettered,
            5003 => Self::PaymentMethodInvalid,

            6001 => Self::TableNotFound,
            6002 => Self::TableNotAvailable,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConflictRetryExhausted,
            9004 => Self::DependencyUnavailable,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::SubOrderNotFound,
            ErrorCode::DuplicateFanOut,
            ErrorCode::IntakeDeadLettered,
            ErrorCode::TableNotFound,
            ErrorCode::ConflictRetryExhausted,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(ErrorCode::SubOrderNotFound.to_string(), "E4002");
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let back: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(back, ErrorCode::OrderNotFound);
    }
}
