//! Venue Tables API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::order::TableSnapshot;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{VenueTable, VenueTableCreate};
use crate::db::repository::{RepoError, VenueTableRepository, parse_ref};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/tables - every table in the caller's venue, WEB-n virtual
/// tables included
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<TableSnapshot>>> {
    user.require_venue_access()?;
    let tables = VenueTableRepository::new(state.get_db())
        .find_by_venue(&user.venue_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(tables.iter().map(VenueTable::snapshot).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    pub name: String,
    pub capacity: Option<i32>,
}

/// POST /api/tables - provision a physical table in the caller's venue
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<TableSnapshot>> {
    user.require_venue_access()?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Table name is required").with_detail("field", "name"));
    }
    let venue =
        parse_ref("venue", &user.venue_id).map_err(|e| AppError::validation(e.to_string()))?;

    let table = VenueTableRepository::new(state.get_db())
        .create_physical(VenueTableCreate {
            venue,
            name: payload.name,
            capacity: payload.capacity,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            other => AppError::database(other.to_string()),
        })?;
    Ok(Json(table.snapshot()))
}
