use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{auth::AuthenticatedUser, staff::CreateStaffRequest},
    services::staff::StaffService,
    state::AppState,
};

use super::{internal_error, require_admin};

/// GET /staff — admin only
pub async fn list_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    StaffService::list(&state.db)
        .await
        .map(|members| Json(serde_json::to_value(members).unwrap()))
        .map_err(internal_error)
}

/// POST /staff — admin only; provisions the login account too
pub async fn create_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateStaffRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    StaffService::create(&state.db, &body)
        .await
        .map(|member| Json(serde_json::to_value(member).unwrap()))
        .map_err(|e| {
            let msg = e.to_string();
            let status = if msg.contains("already exists") {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(json!({ "error": msg })))
        })
}

/// DELETE /staff/{id} — admin only
pub async fn delete_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    let deleted = StaffService::delete(&state.db, id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Staff member not found" })),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}
