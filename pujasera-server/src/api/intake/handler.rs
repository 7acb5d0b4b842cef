//! Order Intake API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use shared::order::{CartItem, CustomerRef, OrderTotals, PaymentMethod, TableSnapshot};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::IntakeRecord;
use crate::db::repository::IntakeRepository;
use crate::orders::{CheckoutRequest, IntakeService};
use crate::utils::{AppError, AppResult};

/// Checkout request body from the customer-facing channel
///
/// Required fields are modeled as Option so a missing field produces a
/// field-level validation error rather than a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    /// Venue identity: record id or public slug
    #[validate(length(min = 1, message = "storeId must not be empty"))]
    pub store_id: Option<String>,
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub service_fee_amount: f64,
    #[serde(default)]
    pub total_amount: f64,
    pub payment_method: Option<PaymentMethod>,
    /// Physical table id for table-side checkouts
    #[serde(default)]
    pub table_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub success: bool,
    pub message: String,
    pub intake_id: String,
    /// The table anchoring this order, when one was assigned (WEB-n for
    /// pay-at-cashier checkouts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSnapshot>,
}

/// POST /api/intake - accept a customer checkout
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<IntakeRequest>,
) -> AppResult<Json<IntakeResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let store_id = payload
        .store_id
        .ok_or_else(|| AppError::validation("storeId is required").with_detail("field", "storeId"))?;
    let customer = payload.customer.ok_or_else(|| {
        AppError::validation("customer is required").with_detail("field", "customer")
    })?;
    let payment_method = payload.payment_method.ok_or_else(|| {
        AppError::validation("paymentMethod is required").with_detail("field", "paymentMethod")
    })?;

    let request = CheckoutRequest {
        venue_identity: store_id,
        customer,
        cart: payload.cart,
        totals: OrderTotals {
            subtotal: payload.subtotal,
            discount_amount: payload.discount_amount,
            tax_amount: payload.tax_amount,
            service_fee_amount: payload.service_fee_amount,
            total_amount: payload.total_amount,
        },
        payment_method,
        table_id: payload.table_id,
    };

    let outcome = IntakeService::new(state.get_db()).submit(request).await?;

    let message = match &outcome.table {
        Some(table) => format!("Order received, table {}", table.name),
        None => "Order received".to_string(),
    };
    Ok(Json(IntakeResponse {
        success: true,
        message,
        intake_id: outcome.intake_id,
        table: outcome.table,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterQuery {
    /// Defaults to the caller's venue
    pub venue_id: Option<String>,
}

/// GET /api/intake/dead-letter - parked intake records for the venue
pub async fn list_dead_letter(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DeadLetterQuery>,
) -> AppResult<Json<Vec<IntakeRecord>>> {
    user.require_venue_access()?;
    let venue_id = query.venue_id.unwrap_or_else(|| user.venue_id.clone());
    let records = IntakeRepository::new(state.get_db())
        .find_dead_letter(&venue_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(records))
}
