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
        feedback::{SubmitRatingRequest, VoiceFeedQuery},
    },
    services::feedback::FeedbackService,
    state::AppState,
};

use super::{internal_error, require_admin};

/// POST /feedback — students rate a meal
pub async fn submit_rating(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<SubmitRatingRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    FeedbackService::submit(&state.db, user.user_id, &body)
        .await
        .map(|rating| Json(serde_json::to_value(rating).unwrap()))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

/// GET /feedback/voice?limit= — the public Student Voice wall
pub async fn voice_feed(
    State(state): State<AppState>,
    Query(params): Query<VoiceFeedQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    FeedbackService::voice_feed(&state.db, params.limit.unwrap_or(20))
        .await
        .map(|posts| Json(serde_json::to_value(posts).unwrap()))
        .map_err(internal_error)
}

/// POST /feedback/{id}/like — toggle the caller's like
pub async fn toggle_like(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    FeedbackService::toggle_like(&state.db, id, user.user_id)
        .await
        .map(|liked| Json(json!({ "liked": liked })))
        .map_err(internal_error)
}

/// GET /feedback/summary — admin satisfaction score
pub async fn rating_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    FeedbackService::summary(&state.db)
        .await
        .map(|summary| Json(serde_json::to_value(summary).unwrap()))
        .map_err(internal_error)
}
