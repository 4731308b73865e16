use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        auth::AuthenticatedUser,
        menu::{
            MenuRangeQuery, UpsertDatedMenuRequest, UpsertScheduleRequest, UpsertTemplateRequest,
        },
    },
    services::menu::MenuService,
    state::AppState,
};

use super::{internal_error, require_admin};

/// GET /menus?from=YYYY-MM-DD&to=YYYY-MM-DD — all authenticated users
pub async fn list_menus(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<MenuRangeQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MenuService::list_range(&state.db, params.from, params.to)
        .await
        .map(|entries| Json(serde_json::to_value(entries).unwrap()))
        .map_err(internal_error)
}

/// PUT /menus — admin only
pub async fn upsert_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertDatedMenuRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    MenuService::upsert_dated(&state.db, &body)
        .await
        .map(|entry| Json(serde_json::to_value(entry).unwrap()))
        .map_err(internal_error)
}

/// DELETE /menus/{id} — admin only
pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    let deleted = MenuService::delete_dated(&state.db, id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Menu entry not found" })),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}

/// GET /menus/templates — all authenticated users
pub async fn list_templates(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MenuService::list_templates(&state.db)
        .await
        .map(|templates| Json(serde_json::to_value(templates).unwrap()))
        .map_err(internal_error)
}

/// PUT /menus/templates — admin only
pub async fn upsert_template(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertTemplateRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    MenuService::upsert_template(&state.db, &body)
        .await
        .map(|template| Json(serde_json::to_value(template).unwrap()))
        .map_err(internal_error)
}

/// DELETE /menus/templates/{id} — admin only
pub async fn delete_template(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    let deleted = MenuService::delete_template(&state.db, id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Template not found" })),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}

/// GET /schedules — all authenticated users
pub async fn list_schedules(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MenuService::list_schedules(&state.db)
        .await
        .map(|schedules| Json(serde_json::to_value(schedules).unwrap()))
        .map_err(internal_error)
}

/// PUT /schedules — admin only
pub async fn upsert_schedule(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertScheduleRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    MenuService::upsert_schedule(&state.db, &body)
        .await
        .map(|schedule| Json(serde_json::to_value(schedule).unwrap()))
        .map_err(internal_error)
}
