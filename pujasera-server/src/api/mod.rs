//! API Route Module
//!
//! # Structure
//!
//! - [`health`] - health checks (public)
//! - [`intake`] - customer checkout intake (public) and the
//!   dead-letter view (venue admin)
//! - [`kitchen_orders`] - kitchen views and status transitions
//! - [`tables`] - venue table dashboard
//!
//! Authentication is extractor-based: protected handlers take
//! [`crate::auth::CurrentUser`], public handlers do not.

pub mod health;
pub mod intake;
pub mod kitchen_orders;
pub mod tables;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(intake::router())
        .merge(kitchen_orders::router())
        .merge(tables::router())
}

/// Build the application with all middleware attached
pub fn build_app() -> Router<ServerState> {
    build_router()
        // CORS - the checkout channel is a browser client
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
