use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::menu::MealType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealRating {
    pub id: Uuid,
    pub student_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub rating: i16,
    pub comment: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// A public rating on the Student Voice wall, with its like count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VoicePost {
    pub id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    pub like_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub rating: i16,
    pub comment: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceFeedQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: i64,
}
