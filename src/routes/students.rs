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
        student::{CreateStudentRequest, StudentSearchQuery, UpdateStudentRequest},
    },
    services::students::StudentService,
    state::AppState,
};

use super::{internal_error, require_admin, require_staff};

/// GET /students?search= — staff and admins (the staff lookup box)
pub async fn list_students(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<StudentSearchQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_staff(&user)?;
    StudentService::list(&state.db, params.search.as_deref())
        .await
        .map(|students| Json(serde_json::to_value(students).unwrap()))
        .map_err(internal_error)
}

/// POST /students — admin only; provisions the login account too
pub async fn create_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateStudentRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    if body.email.is_empty() || body.full_name.is_empty() || body.grade.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required fields" })),
        ));
    }

    StudentService::create(&state.db, &body)
        .await
        .map(|student| Json(serde_json::to_value(student).unwrap()))
        .map_err(|e| {
            let msg = e.to_string();
            let status = if msg.contains("already registered") {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(json!({ "error": msg })))
        })
}

/// PUT /students/{id} — admin only
pub async fn update_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    StudentService::update(&state.db, id, &body)
        .await
        .map(|student| Json(serde_json::to_value(student).unwrap()))
        .map_err(|e| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

/// DELETE /students/{id} — admin only
pub async fn delete_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    let deleted = StudentService::delete(&state.db, id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Student not found" })),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}
