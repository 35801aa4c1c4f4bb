//! Request authorization middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Method, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use workforce_auth::{Access, AccessPolicy, AuthError, AuthUser};
use workforce_db::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Route table applied to every request
///
/// Login, health and metrics are public. Writes to employees and
/// departments need an administrator. Everything else needs a valid token.
pub fn default_policy() -> AccessPolicy {
    let admin = Access::Role(Role::Admin);

    AccessPolicy::new(Access::Authenticated)
        .rule(Some(Method::POST), "/auth/login", Access::Public)
        .rule(Some(Method::GET), "/health", Access::Public)
        .rule(Some(Method::GET), "/healthz", Access::Public)
        .rule(Some(Method::GET), "/metrics", Access::Public)
        .rule(Some(Method::POST), "/employees/**", admin)
        .rule(Some(Method::PUT), "/employees/**", admin)
        .rule(Some(Method::DELETE), "/employees/**", admin)
        .rule(Some(Method::POST), "/departments/**", admin)
        .rule(Some(Method::PUT), "/departments/**", admin)
        .rule(Some(Method::DELETE), "/departments/**", admin)
}

/// Evaluate the access policy before the request reaches its handler
///
/// On success the caller's [`AuthUser`] is stored in the request extensions.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let decision = state
        .policy
        .authorize(&state.jwt, request.method(), request.uri().path(), header);

    match decision {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
        }
        Ok(None) => {}
        Err(e) => {
            counter!("workforce_auth_rejections_total", "reason" => e.reason()).increment(1);
            return Err(e.into());
        }
    }

    Ok(next.run(request).await)
}

/// Extractor for the caller identity set by [`authorize`]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Auth(AuthError::MissingAuthHeader))
    }
}
