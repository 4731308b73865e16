use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        auth::AuthenticatedUser,
        knowledge::{KnowledgeEntry, UpsertKnowledgeRequest},
    },
    state::AppState,
};

use super::{internal_error, require_admin};

/// GET /knowledge — admin management view (all entries, active or not)
pub async fn list_entries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let rows = sqlx::query_as::<_, KnowledgeEntry>(
        "SELECT * FROM knowledge_base ORDER BY category, created_at",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| internal_error(e.into()))?;

    Ok(Json(serde_json::to_value(rows).unwrap()))
}

/// POST /knowledge — admin only
pub async fn create_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertKnowledgeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let entry = sqlx::query_as::<_, KnowledgeEntry>(
        "INSERT INTO knowledge_base (question, answer, category, is_active)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&body.question)
    .bind(&body.answer)
    .bind(body.category.as_deref().unwrap_or("general"))
    .bind(body.is_active.unwrap_or(true))
    .fetch_one(&state.db)
    .await
    .map_err(|e| internal_error(e.into()))?;

    Ok(Json(serde_json::to_value(entry).unwrap()))
}

/// PUT /knowledge/{id} — admin only
pub async fn update_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpsertKnowledgeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let entry = sqlx::query_as::<_, KnowledgeEntry>(
        "UPDATE knowledge_base SET
            question = $1, answer = $2,
            category = COALESCE($3, category),
            is_active = COALESCE($4, is_active),
            updated_at = NOW()
         WHERE id = $5 RETURNING *",
    )
    .bind(&body.question)
    .bind(&body.answer)
    .bind(&body.category)
    .bind(body.is_active)
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| internal_error(e.into()))?
    .ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Entry not found" })),
    ))?;

    Ok(Json(serde_json::to_value(entry).unwrap()))
}

/// DELETE /knowledge/{id} — admin only
pub async fn delete_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let result = sqlx::query("DELETE FROM knowledge_base WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| internal_error(e.into()))?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Entry not found" })),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}
