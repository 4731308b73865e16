use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The three served meals. Maps to the Postgres `meal_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

/// A menu description scoped to one concrete calendar date and meal type.
/// Always takes precedence over the weekly template for that weekday.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DatedMenu {
    pub id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recurring weekday default, used as fallback when no dated menu exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyTemplate {
    pub id: Uuid,
    pub day_of_week: String,
    pub meal_type: MealType,
    pub main_dish: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Configured serving window for one meal type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealSchedule {
    pub id: Uuid,
    pub meal_type: MealType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertDatedMenuRequest {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertTemplateRequest {
    pub day_of_week: String,
    pub meal_type: MealType,
    pub main_dish: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertScheduleRequest {
    pub meal_type: MealType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: Option<bool>,
}

/// Query params for GET /menus.
#[derive(Debug, Deserialize)]
pub struct MenuRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
