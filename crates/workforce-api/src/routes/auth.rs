//! Authentication routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse};

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;
    debug!("Login attempt for {}", request.email);

    let outcome = state.auth.login(&request.email, &request.password).await?;

    let expires_in = state.jwt.token_ttl().num_seconds();

    Ok(Json(LoginResponse::new(outcome, expires_in)))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}
