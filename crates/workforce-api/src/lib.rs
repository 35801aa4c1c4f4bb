//! Workforce REST API
//!
//! This crate provides the Axum-based HTTP API for Workforce: login,
//! employee and department management, and daily summary queries, all
//! behind a per-route authorization middleware.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorCode};
pub use middleware::{CurrentUser, default_policy};
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
