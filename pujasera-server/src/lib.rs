//! Pujasera Server - multi-tenant food-court order orchestration
//!
//! One venue hosts independently managed tenant stalls. A customer
//! checkout spanning several stalls becomes one parent order owned by
//! the venue plus one sub-order per contributing tenant, joined by a
//! shared receipt number. Each tenant kitchen only ever sees and
//! updates its own slice; the venue dashboard sees the whole order.
//!
//! # Module structure
//!
//! ```text
//! pujasera-server/src/
//! ├── core/          # Config, state, server, errors
//! ├── auth/          # JWT authentication, roles
//! ├── db/            # Embedded SurrealDB: models + repositories
//! ├── orders/        # Intake, fan-out, orchestrator, kitchen view, worker
//! ├── notify/        # Notification trigger boundary
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging and common helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use orders::{FanOutService, IntakeService, KitchenViewBuilder, OrderOrchestrator};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
