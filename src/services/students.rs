use sqlx::PgPool;
use uuid::Uuid;

use crate::models::student::{CreateStudentRequest, Student, UpdateStudentRequest};

const DEFAULT_PASSWORD: &str = "Welcome123!";

pub struct StudentService;

impl StudentService {
    /// Provision a login user plus a student record with a generated
    /// business id. Both rows are created in one transaction so a failure
    /// leaves no orphaned account.
    pub async fn create(pool: &PgPool, req: &CreateStudentRequest) -> anyhow::Result<Student> {
        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&req.email)
                .fetch_one(pool)
                .await?;
        if email_taken {
            anyhow::bail!("Email already registered");
        }

        let password = req.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
        let password_hash = bcrypt::hash(password, 12)?;

        let mut tx = pool.begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, full_name, role)
             VALUES ($1, $2, $3, 'student') RETURNING id",
        )
        .bind(&req.email)
        .bind(&password_hash)
        .bind(&req.full_name)
        .fetch_one(&mut *tx)
        .await?;

        let seq: i64 = sqlx::query_scalar("SELECT nextval('student_id_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let student_id = format!("IFB-{seq:04}");

        let student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (student_id, user_id, full_name, grade, sex, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&student_id)
        .bind(user_id)
        .bind(&req.full_name)
        .bind(&req.grade)
        .bind(&req.sex)
        .bind(req.status.as_deref().unwrap_or("active"))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(student)
    }

    /// List students, optionally filtered by a case-insensitive match on the
    /// business id or full name (the staff search box).
    pub async fn list(pool: &PgPool, search: Option<&str>) -> anyhow::Result<Vec<Student>> {
        let students = match search.filter(|s| !s.is_empty()) {
            Some(q) => {
                let pattern = format!("%{q}%");
                sqlx::query_as::<_, Student>(
                    "SELECT * FROM students
                     WHERE student_id ILIKE $1 OR full_name ILIKE $1
                     ORDER BY full_name LIMIT 50",
                )
                .bind(pattern)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY full_name")
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(students)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateStudentRequest,
    ) -> anyhow::Result<Student> {
        let student = sqlx::query_as::<_, Student>(
            "UPDATE students SET
                full_name = COALESCE($1, full_name),
                grade = COALESCE($2, grade),
                sex = COALESCE($3, sex),
                status = COALESCE($4, status),
                updated_at = NOW()
             WHERE id = $5
             RETURNING *",
        )
        .bind(&req.full_name)
        .bind(&req.grade)
        .bind(&req.sex)
        .bind(&req.status)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Student not found"))?;
        Ok(student)
    }

    /// Delete the student record and its login user (if any).
    pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let user_id: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT user_id FROM students WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if let Some(uid) = user_id {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(uid)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(true)
    }
}
