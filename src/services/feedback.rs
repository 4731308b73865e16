use sqlx::PgPool;
use uuid::Uuid;

use crate::models::feedback::{MealRating, RatingSummary, SubmitRatingRequest, VoicePost};

pub struct FeedbackService;

impl FeedbackService {
    /// Submit (or overwrite) the caller's rating for one meal. The caller is
    /// a student user; the rating hangs off their student record.
    pub async fn submit(
        pool: &PgPool,
        user_id: Uuid,
        req: &SubmitRatingRequest,
    ) -> anyhow::Result<MealRating> {
        if !(1..=5).contains(&req.rating) {
            anyhow::bail!("Rating must be between 1 and 5");
        }

        let student_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM students WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        let student_id =
            student_id.ok_or_else(|| anyhow::anyhow!("No student record for this account"))?;

        let rating = sqlx::query_as::<_, MealRating>(
            "INSERT INTO meal_ratings (student_id, meal_date, meal_type, rating, comment, is_public)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (student_id, meal_date, meal_type) DO UPDATE SET
                 rating = EXCLUDED.rating,
                 comment = EXCLUDED.comment,
                 is_public = EXCLUDED.is_public
             RETURNING *",
        )
        .bind(student_id)
        .bind(req.meal_date)
        .bind(req.meal_type)
        .bind(req.rating)
        .bind(&req.comment)
        .bind(req.is_public.unwrap_or(false))
        .fetch_one(pool)
        .await?;

        Ok(rating)
    }

    /// The public Student Voice wall: public ratings newest first, with like
    /// counts and the author's display name.
    pub async fn voice_feed(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<VoicePost>> {
        let posts = sqlx::query_as::<_, VoicePost>(
            "SELECT r.id, r.meal_date, r.meal_type, r.rating, r.comment, r.created_at,
                    s.full_name AS student_name,
                    COUNT(l.user_id) AS like_count
             FROM meal_ratings r
             JOIN students s ON s.id = r.student_id
             LEFT JOIN feedback_likes l ON l.rating_id = r.id
             WHERE r.is_public = TRUE
             GROUP BY r.id, r.meal_date, r.meal_type, r.rating, r.comment, r.created_at, s.full_name
             ORDER BY r.created_at DESC
             LIMIT $1",
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    /// Toggle the caller's like on a public rating. Returns the new state.
    pub async fn toggle_like(pool: &PgPool, rating_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let removed = sqlx::query("DELETE FROM feedback_likes WHERE rating_id = $1 AND user_id = $2")
            .bind(rating_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO feedback_likes (rating_id, user_id) VALUES ($1, $2)")
            .bind(rating_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(true)
    }

    /// Average satisfaction score across all ratings (admin dashboard).
    pub async fn summary(pool: &PgPool) -> anyhow::Result<RatingSummary> {
        let (average, count): (Option<f64>, i64) =
            sqlx::query_as("SELECT AVG(rating)::FLOAT8, COUNT(*) FROM meal_ratings")
                .fetch_one(pool)
                .await?;
        Ok(RatingSummary { average, count })
    }
}
