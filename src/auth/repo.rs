use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::ApiError;

impl User {
    /// Find a user by username or email. Email comparisons are
    /// case-insensitive because addresses are stored lowercased.
    pub async fn find_by_identifier(
        db: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   created_at, updated_at
            FROM users
            WHERE username = $1 OR email = LOWER($1)
            "#,
        )
        .bind(identifier)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user. Uniqueness of username and email is enforced by
    /// the database constraints; violations surface as `Duplicate`.
    pub async fn create(
        db: &PgPool,
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, username, email, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Partial profile update: absent fields keep their stored values.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                username   = COALESCE($4, username),
                email      = COALESCE($5, email),
                updated_at = now()
            WHERE id = $1
            RETURNING id, first_name, last_name, username, email, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(username)
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }
}
