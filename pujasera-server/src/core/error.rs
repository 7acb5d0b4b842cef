use thiserror::Error;

/// Server lifecycle errors (startup, shutdown, background tasks)
///
/// Request-level errors use [`crate::utils::AppError`]; this type only
/// covers failures outside the request path.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
