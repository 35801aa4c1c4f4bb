//! Employee routes

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use tracing::debug;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

use super::types::{EmployeeRequest, EmployeeResponse};

/// GET /employees
async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    let employees = state.employees.list().await?;
    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

/// POST /employees (Admin only)
async fn create_employee(
    State(state): State<AppState>,
    body: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EmployeeResponse>), ApiError> {
    let Json(request) = body?;
    debug!("Creating employee: {:?}", request.email);

    let record = state.employees.create(request.into()).await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /employees/{id}
async fn get_employee(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    let Path(id) = path?;
    let record = state.employees.get(id).await?;
    Ok(Json(record.into()))
}

/// PUT /employees/{id} (Admin only)
async fn update_employee(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    let Path(id) = path?;
    let Json(request) = body?;
    debug!("Updating employee: {}", id);

    let record = state.employees.update(id, request.into()).await?;
    Ok(Json(record.into()))
}

/// DELETE /employees/{id} (Admin only)
async fn delete_employee(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    debug!("Deleting employee {} on behalf of {}", id, caller.email);

    state.employees.delete(id, &caller.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create employee routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}
