//! Kitchen Orders API Handlers
//!
//! Status transitions notify the customer after the transaction
//! commits; notification failures are logged inside the notifier and
//! never affect the response.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::order::OrderStatus;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::notify::StatusNotification;
use crate::orders::{KitchenViewBuilder, OrderOrchestrator, OrderSlice};
use crate::utils::{AppError, AppResult};

/// GET /api/kitchen/orders - the caller's kitchen view
///
/// Tenant-scoped roles see their own stall's active sub-orders; venue
/// roles see every active order exploded into per-stall slices. Both
/// FIFO by checkout time.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderSlice>>> {
    let views = KitchenViewBuilder::new(state.get_db());
    let slices = match &user.tenant_id {
        Some(tenant_id) if user.role.is_tenant_scoped() => views.tenant_view(tenant_id).await?,
        _ => views.venue_view(&user.venue_id).await?,
    };
    Ok(Json(slices))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadyRequest {
    pub tenant_id: Option<String>,
    /// Optional; must match the caller's venue when present. The
    /// credential decides which venue is acted on either way.
    pub venue_id: Option<String>,
    pub receipt_number: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub success: bool,
    pub message: String,
    pub receipt_number: i64,
    pub status: OrderStatus,
}

/// POST /api/kitchen/orders/ready - tenant marks its slice ready
pub async fn mark_ready(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MarkReadyRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let tenant_id = payload.tenant_id.ok_or_else(|| {
        AppError::validation("tenantId is required").with_detail("field", "tenantId")
    })?;
    let receipt_number = payload.receipt_number.ok_or_else(|| {
        AppError::validation("receiptNumber is required").with_detail("field", "receiptNumber")
    })?;
    if let Some(venue_id) = &payload.venue_id {
        user.require_venue(venue_id)?;
    }
    user.require_kitchen_access(&tenant_id)?;

    let parent = OrderOrchestrator::new(state.get_db())
        .mark_ready(&user.venue_id, &tenant_id, receipt_number)
        .await?;

    state.notify_status_change(StatusNotification {
        venue_id: user.venue_id.clone(),
        receipt_number,
        customer_id: parent.customer.id.clone(),
        customer_contact: parent.customer.contact.clone(),
        status: OrderStatus::ReadyForPickup,
        tenant_id: Some(tenant_id),
    });

    Ok(Json(TransitionResponse {
        success: true,
        message: format!("Order #{} marked ready for pickup", receipt_number),
        receipt_number,
        status: OrderStatus::ReadyForPickup,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    /// Optional; must match the caller's venue when present
    pub venue_id: Option<String>,
    pub receipt_number: Option<i64>,
}

/// POST /api/kitchen/orders/complete - venue finalizes an order
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FinalizeRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let receipt_number = payload.receipt_number.ok_or_else(|| {
        AppError::validation("receiptNumber is required").with_detail("field", "receiptNumber")
    })?;
    if let Some(venue_id) = &payload.venue_id {
        user.require_venue(venue_id)?;
    }
    user.require_venue_access()?;

    let outcome = OrderOrchestrator::new(state.get_db())
        .complete(&user.venue_id, receipt_number)
        .await?;

    state.notify_status_change(StatusNotification {
        venue_id: user.venue_id.clone(),
        receipt_number,
        customer_id: outcome.order.customer.id.clone(),
        customer_contact: outcome.order.customer.contact.clone(),
        status: OrderStatus::Completed,
        tenant_id: None,
    });

    let message = match outcome.released_table {
        Some(table) => format!("Order #{} completed, table {} released", receipt_number, table),
        None => format!("Order #{} completed", receipt_number),
    };
    Ok(Json(TransitionResponse {
        success: true,
        message,
        receipt_number,
        status: OrderStatus::Completed,
    }))
}

/// POST /api/kitchen/orders/cancel - venue cancels an order still in
/// preparation
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FinalizeRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let receipt_number = payload.receipt_number.ok_or_else(|| {
        AppError::validation("receiptNumber is required").with_detail("field", "receiptNumber")
    })?;
    if let Some(venue_id) = &payload.venue_id {
        user.require_venue(venue_id)?;
    }
    user.require_venue_access()?;

    let outcome = OrderOrchestrator::new(state.get_db())
        .cancel(&user.venue_id, receipt_number)
        .await?;

    state.notify_status_change(StatusNotification {
        venue_id: user.venue_id.clone(),
        receipt_number,
        customer_id: outcome.order.customer.id.clone(),
        customer_contact: outcome.order.customer.contact.clone(),
        status: OrderStatus::Cancelled,
        tenant_id: None,
    });

    Ok(Json(TransitionResponse {
        success: true,
        message: format!("Order #{} cancelled", receipt_number),
        receipt_number,
        status: OrderStatus::Cancelled,
    }))
}
