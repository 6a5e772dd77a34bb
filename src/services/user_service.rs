use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User> {
        let email_taken = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if email_taken.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let username_taken =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        if username_taken.is_some() {
            return Err(Error::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        // Same error for unknown email and bad password.
        let user =
            user.ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;
        if !verify_password(password, &user.password_hash)? {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        user.ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}
