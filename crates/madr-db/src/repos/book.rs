use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub novelist_id: i64,
    pub created_at: DateTime<Utc>,
}

pub struct BookRepo;

impl BookRepo {
    /// Insert a book. Title must already be case-folded; a dangling
    /// novelist_id fails with a foreign key violation.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        year: i32,
        novelist_id: i64,
    ) -> DbResult<BookRow> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"INSERT INTO book (title, year, novelist_id) VALUES ($1, $2, $3)
               RETURNING id, title, year, novelist_id, created_at"#,
        )
        .bind(title)
        .bind(year)
        .bind(novelist_id)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> DbResult<Option<BookRow>> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, year, novelist_id, created_at FROM book WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_title(pool: &PgPool, title: &str) -> DbResult<Option<BookRow>> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, year, novelist_id, created_at FROM book WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// List books. `title` filters by substring of the stored (folded)
    /// title; `year` is matched as a substring of the year's decimal text.
    pub async fn list(
        pool: &PgPool,
        title: Option<&str>,
        year: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<BookRow>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"SELECT id, title, year, novelist_id, created_at FROM book
               WHERE ($1::text IS NULL OR title LIKE '%' || $1 || '%')
                 AND ($2::text IS NULL OR year::text LIKE '%' || $2 || '%')
               ORDER BY id
               LIMIT $3 OFFSET $4"#,
        )
        .bind(title)
        .bind(year)
        .bind(limit.max(0))
        .bind(offset.max(0))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Partial update: only fields passed as Some are changed. Returns None
    /// when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        title: Option<&str>,
        year: Option<i32>,
        novelist_id: Option<i64>,
    ) -> DbResult<Option<BookRow>> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"UPDATE book SET
                   title = COALESCE($2, title),
                   year = COALESCE($3, year),
                   novelist_id = COALESCE($4, novelist_id)
               WHERE id = $1
               RETURNING id, title, year, novelist_id, created_at"#,
        )
        .bind(id)
        .bind(title)
        .bind(year)
        .bind(novelist_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Delete a book. Returns false when the id does not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM book WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
