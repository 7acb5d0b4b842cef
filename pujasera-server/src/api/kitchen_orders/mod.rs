//! Kitchen Orders API Module
//!
//! # Routes
//!
//! | Path | Method | Description | Auth |
//! |------|--------|-------------|------|
//! | /api/kitchen/orders | GET | Kitchen view (venue-wide or own stall) | any role |
//! | /api/kitchen/orders/ready | POST | Mark own slice ready | tenant roles |
//! | /api/kitchen/orders/complete | POST | Finalize an order | venue roles |
//! | /api/kitchen/orders/cancel | POST | Cancel an order | venue roles |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/ready", post(handler::mark_ready))
        .route("/complete", post(handler::complete))
        .route("/cancel", post(handler::cancel))
}
