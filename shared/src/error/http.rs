//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::VenueNotFound
            | Self::TenantNotFound
            | Self::OrderNotFound
            | Self::SubOrderNotFound
            | Self::IntakeNotFound
            | Self::TableNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled
            | Self::DuplicateFanOut
            | Self::ConflictRetryExhausted => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired | Self::TenantMismatch => {
                StatusCode::FORBIDDEN
            }

            // 422 Unprocessable Entity
            Self::InvalidStatusTransition
            | Self::TenantNotEnabled
            | Self::IntakeDeadLettered
            | Self::TableNotAvailable => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::OrderEmpty
            | Self::PaymentMethodInvalid => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            Self::DependencyUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
