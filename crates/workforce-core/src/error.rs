//! Core error types

use thiserror::Error;
use workforce_auth::AuthError;
use workforce_db::DbError;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate resource: {0}")]
    Duplicate(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    /// A business rule forbids the operation
    #[error("Operation not allowed: {0}")]
    Conflict(String),
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => CoreError::NotFound(msg),
            DbError::Duplicate(msg) => CoreError::Duplicate(msg),
            DbError::Referenced(msg) => CoreError::Conflict(msg),
            other => CoreError::Database(other),
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}
