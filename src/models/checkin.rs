use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::menu::MealType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealCheckin {
    pub id: Uuid,
    pub student_id: Uuid,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Check-in row joined with the student's display fields (admin report).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CheckinWithStudent {
    pub id: Uuid,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub student_code: String,
    pub student_name: String,
}

/// Body for POST /checkins. `student_id` is the scanned QR payload
/// (the business id, not the row UUID).
#[derive(Debug, Deserialize)]
pub struct RecordCheckinRequest {
    pub student_id: String,
    pub meal_type: MealType,
}

#[derive(Debug, Deserialize)]
pub struct CheckinQuery {
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct CheckinStats {
    pub total: i64,
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
    pub recent: Vec<CheckinWithStudent>,
}
