//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Record is still referenced: {0}")]
    Referenced(String),
}

/// SQLITE_CONSTRAINT_TRIGGER, raised for `ON DELETE RESTRICT` references
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

impl DbError {
    /// Translate UNIQUE and FOREIGN KEY violations into typed errors
    pub(crate) fn from_constraint(err: sqlx::Error, what: impl Into<String>) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => DbError::Duplicate(what.into()),
            Some(db_err)
                if db_err.is_foreign_key_violation()
                    || db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER) =>
            {
                DbError::Referenced(what.into())
            }
            _ => DbError::Connection(err),
        }
    }
}
