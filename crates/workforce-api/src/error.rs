//! API error types
//!
//! Every failure leaving the API is translated here, once, into a status
//! code and a JSON body of the form
//! `{message, errorCode, timestamp, errors, errorId}`.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;
use workforce_auth::AuthError;
use workforce_core::CoreError;

/// Numeric error codes reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthenticationFailed,
    InvalidCredentials,
    UnauthorizedAccess,
    TokenExpired,
    ValidationError,
    InvalidInput,
    ResourceNotFound,
    DuplicateResource,
    OperationFailed,
    InternalServerError,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::AuthenticationFailed => 1000,
            ErrorCode::InvalidCredentials => 1001,
            ErrorCode::UnauthorizedAccess => 1002,
            ErrorCode::TokenExpired => 1003,
            ErrorCode::ValidationError => 2000,
            ErrorCode::InvalidInput => 2001,
            ErrorCode::ResourceNotFound => 3000,
            ErrorCode::DuplicateResource => 3001,
            ErrorCode::OperationFailed => 3002,
            ErrorCode::InternalServerError => 9000,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::AuthenticationFailed
            | ErrorCode::InvalidCredentials
            | ErrorCode::TokenExpired => StatusCode::UNAUTHORIZED,
            ErrorCode::UnauthorizedAccess => StatusCode::FORBIDDEN,
            ErrorCode::ValidationError | ErrorCode::InvalidInput | ErrorCode::OperationFailed => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DuplicateResource => StatusCode::CONFLICT,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Request could not be parsed
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub error_code: u16,
    pub timestamp: String,
    pub errors: BTreeMap<String, String>,
    pub error_id: String,
}

fn auth_code(err: &AuthError) -> (ErrorCode, String) {
    match err {
        AuthError::InvalidCredentials => (
            ErrorCode::InvalidCredentials,
            "Invalid email or password".to_string(),
        ),
        AuthError::TokenExpired => (ErrorCode::TokenExpired, "Token has expired".to_string()),
        AuthError::InsufficientPermissions => (
            ErrorCode::UnauthorizedAccess,
            "You do not have permission to access this resource".to_string(),
        ),
        AuthError::MissingAuthHeader
        | AuthError::InvalidAuthHeader
        | AuthError::MalformedToken
        | AuthError::InvalidSignature
        | AuthError::Jwt(_) => (
            ErrorCode::AuthenticationFailed,
            "Authentication failed".to_string(),
        ),
        AuthError::PasswordHash(_) => internal(),
    }
}

fn internal() -> (ErrorCode, String) {
    (
        ErrorCode::InternalServerError,
        "An unexpected error occurred".to_string(),
    )
}

impl ApiError {
    /// Error code, client-facing message and field errors
    fn describe(&self) -> (ErrorCode, String, BTreeMap<String, String>) {
        let (code, message) = match self {
            ApiError::BadRequest(msg) => (ErrorCode::InvalidInput, msg.clone()),
            ApiError::NotFound(msg) => (ErrorCode::ResourceNotFound, msg.clone()),
            ApiError::Internal(_) => internal(),
            ApiError::Auth(e) => auth_code(e),
            ApiError::Core(e) => match e {
                CoreError::Validation(errors) => {
                    return (
                        ErrorCode::ValidationError,
                        "Validation failed".to_string(),
                        errors.fields().clone(),
                    );
                }
                CoreError::NotFound(msg) => (ErrorCode::ResourceNotFound, msg.clone()),
                CoreError::Duplicate(msg) => (ErrorCode::DuplicateResource, msg.clone()),
                CoreError::Conflict(msg) => (ErrorCode::OperationFailed, msg.clone()),
                CoreError::Auth(e) => auth_code(e),
                CoreError::Database(_) => internal(),
            },
        };
        (code, message, BTreeMap::new())
    }

    pub fn code(&self) -> ErrorCode {
        self.describe().0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message, errors) = self.describe();
        let error_id = Uuid::new_v4().to_string();

        if code == ErrorCode::InternalServerError {
            error!(error_id = %error_id, "Request failed: {}", self);
        } else {
            warn!(error_id = %error_id, code = code.code(), "Request rejected: {}", self);
        }

        let body = ErrorBody {
            message,
            error_code: code.code(),
            timestamp: Utc::now().to_rfc3339(),
            errors,
            error_id,
        };

        (code.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::ValidationErrors;

    #[test]
    fn test_error_table() {
        let cases: Vec<(ApiError, u16, StatusCode)> = vec![
            (AuthError::MissingAuthHeader.into(), 1000, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials.into(), 1001, StatusCode::UNAUTHORIZED),
            (AuthError::InsufficientPermissions.into(), 1002, StatusCode::FORBIDDEN),
            (AuthError::TokenExpired.into(), 1003, StatusCode::UNAUTHORIZED),
            (
                CoreError::Validation(ValidationErrors::single("name", "Name is required")).into(),
                2000,
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::BadRequest("bad json".into()), 2001, StatusCode::BAD_REQUEST),
            (CoreError::NotFound("x".into()).into(), 3000, StatusCode::NOT_FOUND),
            (CoreError::Duplicate("x".into()).into(), 3001, StatusCode::CONFLICT),
            (CoreError::Conflict("x".into()).into(), 3002, StatusCode::BAD_REQUEST),
            (ApiError::Internal("boom".into()), 9000, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, code, status) in cases {
            assert_eq!(error.code().code(), code, "{}", error);
            assert_eq!(error.code().status(), status, "{}", error);
        }
    }

    #[test]
    fn test_internal_details_stay_hidden() {
        let (_, message, errors) = ApiError::Internal("disk on fire".into()).describe();
        assert!(!message.contains("disk"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validation_carries_field_errors() {
        let err: ApiError =
            CoreError::Validation(ValidationErrors::single("salary", "Salary is required")).into();
        let (_, _, errors) = err.describe();
        assert_eq!(
            errors.get("salary").map(String::as_str),
            Some("Salary is required")
        );
    }
}
