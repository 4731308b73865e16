pub mod announcements;
pub mod assistant;
pub mod auth;
pub mod backup;
pub mod checkins;
pub mod feedback;
pub mod health;
pub mod knowledge;
pub mod menus;
pub mod staff;
pub mod students;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::models::{auth::AuthenticatedUser, user::UserRole};

pub(crate) fn require_admin(
    user: &AuthenticatedUser,
) -> Result<(), (StatusCode, Json<Value>)> {
    if user.role != UserRole::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Admin access required" })),
        ));
    }
    Ok(())
}

/// Staff and admins; students are rejected.
pub(crate) fn require_staff(
    user: &AuthenticatedUser,
) -> Result<(), (StatusCode, Json<Value>)> {
    if user.role == UserRole::Student {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Staff access required" })),
        ));
    }
    Ok(())
}

pub(crate) fn internal_error(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
