use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        announcement::{Announcement, CreateAnnouncementRequest},
        auth::AuthenticatedUser,
    },
    state::AppState,
};

use super::{internal_error, require_admin};

/// GET /announcements — latest 10, newest first, any authenticated user
pub async fn list_announcements(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let rows = sqlx::query_as::<_, Announcement>(
        "SELECT * FROM announcements ORDER BY created_at DESC LIMIT 10",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| internal_error(e.into()))?;

    Ok(Json(serde_json::to_value(rows).unwrap()))
}

/// POST /announcements — admin only
pub async fn create_announcement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateAnnouncementRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let announcement = sqlx::query_as::<_, Announcement>(
        "INSERT INTO announcements (title, content, created_by) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&body.title)
    .bind(&body.content)
    .bind(user.user_id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| internal_error(e.into()))?;

    Ok(Json(serde_json::to_value(announcement).unwrap()))
}

/// DELETE /announcements/{id} — admin only
pub async fn delete_announcement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| internal_error(e.into()))?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Announcement not found" })),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}
