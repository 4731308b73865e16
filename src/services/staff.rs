use sqlx::PgPool;
use uuid::Uuid;

use crate::models::staff::{CreateStaffRequest, StaffMember};

pub struct StaffService;

impl StaffService {
    /// Provision a staff login plus the staff record in one transaction.
    pub async fn create(pool: &PgPool, req: &CreateStaffRequest) -> anyhow::Result<StaffMember> {
        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&req.email)
                .fetch_one(pool)
                .await?;
        if email_taken {
            anyhow::bail!(
                "A staff member with this email already exists. Please use a different email address."
            );
        }

        let password_hash = bcrypt::hash(&req.password, 12)?;

        let mut tx = pool.begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, full_name, role)
             VALUES ($1, $2, $3, 'staff') RETURNING id",
        )
        .bind(&req.email)
        .bind(&password_hash)
        .bind(&req.full_name)
        .fetch_one(&mut *tx)
        .await?;

        let seq: i64 = sqlx::query_scalar("SELECT nextval('staff_id_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let staff_id = format!("STF-{seq:04}");

        let member = sqlx::query_as::<_, StaffMember>(
            "INSERT INTO staff (staff_id, user_id, full_name, position)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&staff_id)
        .bind(user_id)
        .bind(&req.full_name)
        .bind(&req.position)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(member)
    }

    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<StaffMember>> {
        let members = sqlx::query_as::<_, StaffMember>("SELECT * FROM staff ORDER BY full_name")
            .fetch_all(pool)
            .await?;
        Ok(members)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let user_id: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT user_id FROM staff WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM staff WHERE id = $1")
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
