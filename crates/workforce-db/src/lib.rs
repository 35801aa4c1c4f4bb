//! Workforce Database Layer
//!
//! This crate provides the persistence layer for Workforce: employees,
//! departments and daily headcount summaries, stored in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
