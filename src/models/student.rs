use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    /// Business identifier printed in the QR card (e.g. "IFB-0042").
    pub student_id: String,
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub grade: String,
    pub sex: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub email: String,
    pub password: Option<String>,
    pub full_name: String,
    pub grade: String,
    pub sex: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub full_name: Option<String>,
    pub grade: Option<String>,
    pub sex: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentSearchQuery {
    pub search: Option<String>,
}
