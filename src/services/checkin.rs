use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::checkin::{CheckinStats, CheckinWithStudent, MealCheckin};
use crate::models::menu::MealType;

#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("Student not found")]
    StudentNotFound,
    #[error("Meal already recorded for today")]
    AlreadyRecorded,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub struct CheckinService;

impl CheckinService {
    /// Record today's meal for the student matching the scanned QR payload
    /// (the business id). One check-in per (student, date, meal type).
    pub async fn record(
        pool: &PgPool,
        student_code: &str,
        meal_type: MealType,
        recorded_by: Uuid,
    ) -> Result<MealCheckin, CheckinError> {
        let student_uuid: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM students WHERE student_id = $1 AND status = 'active'")
                .bind(student_code)
                .fetch_optional(pool)
                .await?;
        let student_uuid = student_uuid.ok_or(CheckinError::StudentNotFound)?;

        let today = Utc::now().date_naive();

        let checkin = sqlx::query_as::<_, MealCheckin>(
            "INSERT INTO meal_checkins (student_id, meal_type, meal_date, recorded_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(student_uuid)
        .bind(meal_type)
        .bind(today)
        .bind(recorded_by)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                CheckinError::AlreadyRecorded
            } else {
                CheckinError::Db(e)
            }
        })?;

        Ok(checkin)
    }

    pub async fn for_student_on(
        pool: &PgPool,
        student_code: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<MealCheckin>> {
        let rows = sqlx::query_as::<_, MealCheckin>(
            "SELECT c.* FROM meal_checkins c
             JOIN students s ON s.id = c.student_id
             WHERE s.student_id = $1 AND c.meal_date = $2",
        )
        .bind(student_code)
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Latest 20 check-ins for one student, newest first.
    pub async fn history(pool: &PgPool, student_code: &str) -> anyhow::Result<Vec<MealCheckin>> {
        let rows = sqlx::query_as::<_, MealCheckin>(
            "SELECT c.* FROM meal_checkins c
             JOIN students s ON s.id = c.student_id
             WHERE s.student_id = $1
             ORDER BY c.meal_date DESC, c.created_at DESC
             LIMIT 20",
        )
        .bind(student_code)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Totals per meal type plus the 10 most recent check-ins (admin report).
    pub async fn stats(pool: &PgPool) -> anyhow::Result<CheckinStats> {
        let (total, breakfast, lunch, dinner): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE meal_type = 'breakfast'),
                    COUNT(*) FILTER (WHERE meal_type = 'lunch'),
                    COUNT(*) FILTER (WHERE meal_type = 'dinner')
             FROM meal_checkins",
        )
        .fetch_one(pool)
        .await?;

        let recent = sqlx::query_as::<_, CheckinWithStudent>(
            "SELECT c.id, c.meal_type, c.meal_date, c.created_at,
                    s.student_id AS student_code, s.full_name AS student_name
             FROM meal_checkins c
             JOIN students s ON s.id = c.student_id
             ORDER BY c.created_at DESC
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;

        Ok(CheckinStats {
            total,
            breakfast,
            lunch,
            dinner,
            recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_checkin_message_is_user_facing() {
        assert_eq!(
            CheckinError::AlreadyRecorded.to_string(),
            "Meal already recorded for today"
        );
        assert_eq!(CheckinError::StudentNotFound.to_string(), "Student not found");
    }
}
