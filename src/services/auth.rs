use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    models::{
        auth::{Claims, LoginResponse},
        user::{User, UserRole},
    },
    services::email::EmailService,
};

pub struct AuthService;

impl AuthService {
    /// Validate credentials and issue an access token.
    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        access_ttl: u64,
    ) -> anyhow::Result<LoginResponse> {
        let user = Self::fetch_user_by_email(pool, email)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Invalid credentials"))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| anyhow::anyhow!("Invalid credentials"))?;
        if !valid {
            anyhow::bail!("Invalid credentials");
        }

        let access_token = Self::generate_access_token(&user, jwt_secret, access_ttl)?;

        Ok(LoginResponse {
            access_token,
            user: user.into(),
        })
    }

    pub async fn fetch_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, role::TEXT as role,
                    is_active, created_at, updated_at
             FROM users WHERE id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    async fn fetch_user_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, role::TEXT as role,
                    is_active, created_at, updated_at
             FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub fn generate_access_token(
        user: &User,
        secret: &str,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        let role: UserRole = user.role.parse().unwrap_or(UserRole::Student);
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            role,
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Change the caller's password (requires current password verification).
    /// Sends a confirmation email best-effort when SMTP is configured.
    pub async fn change_password(
        pool: &PgPool,
        email_svc: Option<&EmailService>,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> anyhow::Result<()> {
        let user = Self::fetch_user(pool, user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let valid = bcrypt::verify(current_password, &user.password_hash)
            .map_err(|_| anyhow::anyhow!("Current password is incorrect"))?;
        if !valid {
            anyhow::bail!("Current password is incorrect");
        }

        let new_hash = bcrypt::hash(new_password, 12)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(pool)
            .await?;

        if let Some(svc) = email_svc {
            let _ = svc
                .send_password_change_confirmation(&user.email, &user.full_name)
                .await;
        }

        Ok(())
    }

    /// Send a password reset email. Always returns Ok to avoid leaking
    /// account existence.
    pub async fn request_password_reset(
        pool: &PgPool,
        email_svc: Option<&EmailService>,
        email: &str,
        base_url: &str,
    ) -> anyhow::Result<()> {
        let user_opt = Self::fetch_user_by_email(pool, email).await?;

        if let Some(user) = user_opt {
            use rand::Rng;
            let token: String = rand::thread_rng()
                .sample_iter(&rand::distributions::Alphanumeric)
                .take(48)
                .map(char::from)
                .collect();

            let expires_at = Utc::now() + chrono::Duration::hours(1);

            sqlx::query(
                "INSERT INTO password_reset_tokens (user_id, token, expires_at)
                 VALUES ($1, $2, $3)",
            )
            .bind(user.id)
            .bind(&token)
            .bind(expires_at)
            .execute(pool)
            .await?;

            if let Some(svc) = email_svc {
                let reset_url = format!("{base_url}/reset-password?token={token}");
                // Ignore send errors — graceful degradation
                let _ = svc
                    .send_password_reset(&user.email, &user.full_name, &reset_url)
                    .await;
            }
        }

        Ok(())
    }

    /// Verify token, hash new password, mark token used.
    pub async fn reset_password(
        pool: &PgPool,
        token_str: &str,
        new_password: &str,
    ) -> anyhow::Result<()> {
        let row: Option<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT id, user_id FROM password_reset_tokens
             WHERE token = $1 AND used = FALSE AND expires_at > NOW()",
        )
        .bind(token_str)
        .fetch_optional(pool)
        .await?;

        let (token_id, user_id) = row.ok_or_else(|| anyhow::anyhow!("Invalid or expired token"))?;

        let password_hash = bcrypt::hash(new_password, 12)?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(pool)
            .await?;

        sqlx::query("UPDATE password_reset_tokens SET used = TRUE WHERE id = $1")
            .bind(token_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
