use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    models::{
        auth::AuthenticatedUser,
        checkin::{CheckinQuery, RecordCheckinRequest},
    },
    services::checkin::{CheckinError, CheckinService},
    state::AppState,
};

use super::{internal_error, require_admin, require_staff};

/// POST /checkins — staff records a scanned QR check-in for today
pub async fn record_checkin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<RecordCheckinRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_staff(&user)?;

    CheckinService::record(&state.db, &body.student_id, body.meal_type, user.user_id)
        .await
        .map(|checkin| Json(serde_json::to_value(checkin).unwrap()))
        .map_err(|e| {
            let status = match &e {
                CheckinError::StudentNotFound => StatusCode::NOT_FOUND,
                CheckinError::AlreadyRecorded => StatusCode::CONFLICT,
                CheckinError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": e.to_string() })))
        })
}

/// GET /checkins/today?student_id= — staff view of a student's meals today
pub async fn today_checkins(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<CheckinQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_staff(&user)?;
    let today = Utc::now().date_naive();
    CheckinService::for_student_on(&state.db, &params.student_id, today)
        .await
        .map(|rows| Json(serde_json::to_value(rows).unwrap()))
        .map_err(internal_error)
}

/// GET /checkins/history?student_id= — latest 20 check-ins for one student
pub async fn checkin_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<CheckinQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_staff(&user)?;
    CheckinService::history(&state.db, &params.student_id)
        .await
        .map(|rows| Json(serde_json::to_value(rows).unwrap()))
        .map_err(internal_error)
}

/// GET /checkins/stats — admin meal report
pub async fn checkin_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    CheckinService::stats(&state.db)
        .await
        .map(|stats| Json(serde_json::to_value(stats).unwrap()))
        .map_err(internal_error)
}
