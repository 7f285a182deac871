use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NovelistRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

pub struct NovelistRepo;

impl NovelistRepo {
    /// Insert a novelist. Name must already be case-folded.
    pub async fn create(pool: &PgPool, name: &str) -> DbResult<NovelistRow> {
        let row = sqlx::query_as::<_, NovelistRow>(
            r#"INSERT INTO novelist (name) VALUES ($1)
               RETURNING id, name, created_at"#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> DbResult<Option<NovelistRow>> {
        let row = sqlx::query_as::<_, NovelistRow>(
            "SELECT id, name, created_at FROM novelist WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_name(pool: &PgPool, name: &str) -> DbResult<Option<NovelistRow>> {
        let row = sqlx::query_as::<_, NovelistRow>(
            "SELECT id, name, created_at FROM novelist WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// List novelists, optionally filtered by a substring of the stored
    /// (folded) name.
    pub async fn list(
        pool: &PgPool,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<NovelistRow>> {
        let rows = sqlx::query_as::<_, NovelistRow>(
            r#"SELECT id, name, created_at FROM novelist
               WHERE ($1::text IS NULL OR name LIKE '%' || $1 || '%')
               ORDER BY id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(name)
        .bind(limit.max(0))
        .bind(offset.max(0))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Rename a novelist. Returns None when the id does not exist.
    pub async fn update(pool: &PgPool, id: i64, name: &str) -> DbResult<Option<NovelistRow>> {
        let row = sqlx::query_as::<_, NovelistRow>(
            r#"UPDATE novelist SET name = $2 WHERE id = $1
               RETURNING id, name, created_at"#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Delete a novelist. Returns false when the id does not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM novelist WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
