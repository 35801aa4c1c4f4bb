//! API routes

mod auth;
mod departments;
mod employees;
mod health;
pub mod metrics;
mod summaries;
pub mod types;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn_with_state};
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::authorize;
use crate::state::{AppState, MetricsHandle};

/// Requests are small JSON documents
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Fallback for unknown routes
async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Create the main router
///
/// Every route except `/metrics` passes through the authorization
/// middleware; `/metrics` is public and mounted only when a handle is given.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(employees::routes())
        .merge(departments::routes())
        .merge(summaries::routes())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), authorize))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
