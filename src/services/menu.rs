use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::menu::{
    DatedMenu, MealSchedule, UpsertDatedMenuRequest, UpsertScheduleRequest,
    UpsertTemplateRequest, WeeklyTemplate,
};

pub struct MenuService;

impl MenuService {
    pub async fn list_range(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<DatedMenu>> {
        let entries = sqlx::query_as::<_, DatedMenu>(
            "SELECT * FROM dated_menus WHERE date BETWEEN $1 AND $2 ORDER BY date, meal_type",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }

    /// Insert or update the menu for a specific (date, meal type).
    pub async fn upsert_dated(
        pool: &PgPool,
        req: &UpsertDatedMenuRequest,
    ) -> anyhow::Result<DatedMenu> {
        let entry = sqlx::query_as::<_, DatedMenu>(
            "INSERT INTO dated_menus (date, meal_type, description)
             VALUES ($1, $2, $3)
             ON CONFLICT (date, meal_type) DO UPDATE SET
                 description = EXCLUDED.description,
                 updated_at = NOW()
             RETURNING *",
        )
        .bind(req.date)
        .bind(req.meal_type)
        .bind(&req.description)
        .fetch_one(pool)
        .await?;
        Ok(entry)
    }

    pub async fn delete_dated(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM dated_menus WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_templates(pool: &PgPool) -> anyhow::Result<Vec<WeeklyTemplate>> {
        let templates = sqlx::query_as::<_, WeeklyTemplate>(
            "SELECT * FROM weekly_menu_templates ORDER BY day_of_week, meal_type",
        )
        .fetch_all(pool)
        .await?;
        Ok(templates)
    }

    /// Insert or update the weekday default. The UNIQUE constraint on
    /// (day_of_week, meal_type) is what keeps the resolver's fallback
    /// deterministic.
    pub async fn upsert_template(
        pool: &PgPool,
        req: &UpsertTemplateRequest,
    ) -> anyhow::Result<WeeklyTemplate> {
        let template = sqlx::query_as::<_, WeeklyTemplate>(
            "INSERT INTO weekly_menu_templates (day_of_week, meal_type, main_dish, description)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (day_of_week, meal_type) DO UPDATE SET
                 main_dish = EXCLUDED.main_dish,
                 description = EXCLUDED.description,
                 updated_at = NOW()
             RETURNING *",
        )
        .bind(&req.day_of_week)
        .bind(req.meal_type)
        .bind(&req.main_dish)
        .bind(&req.description)
        .fetch_one(pool)
        .await?;
        Ok(template)
    }

    pub async fn delete_template(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM weekly_menu_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_schedules(pool: &PgPool) -> anyhow::Result<Vec<MealSchedule>> {
        let schedules = sqlx::query_as::<_, MealSchedule>(
            "SELECT * FROM meal_schedules ORDER BY start_time",
        )
        .fetch_all(pool)
        .await?;
        Ok(schedules)
    }

    /// At most one schedule row per meal type is meaningful; upsert keeps it that way.
    pub async fn upsert_schedule(
        pool: &PgPool,
        req: &UpsertScheduleRequest,
    ) -> anyhow::Result<MealSchedule> {
        let schedule = sqlx::query_as::<_, MealSchedule>(
            "INSERT INTO meal_schedules (meal_type, start_time, end_time, is_active)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (meal_type) DO UPDATE SET
                 start_time = EXCLUDED.start_time,
                 end_time = EXCLUDED.end_time,
                 is_active = EXCLUDED.is_active
             RETURNING *",
        )
        .bind(req.meal_type)
        .bind(req.start_time)
        .bind(req.end_time)
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(pool)
        .await?;
        Ok(schedule)
    }
}
