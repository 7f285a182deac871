use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a new account. Username and email must already be case-folded.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"INSERT INTO account (username, email, password_hash) VALUES ($1, $2, $3)
               RETURNING id, username, email, password_hash, created_at"#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, created_at FROM account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Exact-match lookup by stored (folded) email. Used by the auth
    /// resolver when mapping a token subject back to an account.
    pub async fn get_by_email(pool: &PgPool, email: &str) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, created_at FROM account WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Login lookup: the submitted identifier may be either the email or the
    /// username.
    pub async fn get_by_identifier(pool: &PgPool, identifier: &str) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, email, password_hash, created_at FROM account
               WHERE email = $1 OR username = $1"#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Registration pre-check: any account already holding this username or
    /// email. The UNIQUE constraints remain the authority under races.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, email, password_hash, created_at FROM account
               WHERE username = $1 OR email = $2"#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Full update of an account. Returns None when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"UPDATE account SET username = $2, email = $3, password_hash = $4 WHERE id = $1
               RETURNING id, username, email, password_hash, created_at"#,
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Delete an account. Returns false when the id does not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
