//! Order Intake API Module
//!
//! # Routes
//!
//! | Path | Method | Description | Auth |
//! |------|--------|-------------|------|
//! | /api/intake | POST | Customer checkout | none (public) |
//! | /api/intake/dead-letter | GET | Parked intake records | venue roles |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/intake", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit))
        .route("/dead-letter", get(handler::list_dead_letter))
}
