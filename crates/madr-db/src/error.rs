use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors surfaced by the repositories.
///
/// Constraint violations get their own variants so handlers can translate
/// them into Conflict responses. The database is the final authority on
/// uniqueness and referential integrity: two requests racing on the same
/// key both reach the INSERT, and the loser ends up here.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => return DbError::UniqueViolation,
                ErrorKind::ForeignKeyViolation => return DbError::ForeignKeyViolation,
                _ => {}
            }
        }
        DbError::Database(err)
    }
}

/// Result type for repository operations.
pub type DbResult<T> = std::result::Result<T, DbError>;
