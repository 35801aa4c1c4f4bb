//! Department routes

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
use crate::state::AppState;

use super::types::{DepartmentRequest, DepartmentResponse};

/// GET /departments
async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = state.departments.list().await?;
    Ok(Json(departments.into_iter().map(DepartmentResponse::from).collect()))
}

/// POST /departments (Admin only)
async fn create_department(
    State(state): State<AppState>,
    body: Result<Json<DepartmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    let Json(request) = body?;
    debug!("Creating department: {:?}", request.name);

    let department = state.departments.create(request.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

/// GET /departments/{id}
async fn get_department(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let Path(id) = path?;
    Ok(Json(state.departments.get(id).await?.into()))
}

/// PUT /departments/{id} (Admin only)
async fn update_department(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<DepartmentRequest>, JsonRejection>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let Path(id) = path?;
    let Json(request) = body?;

    let department = state.departments.update(id, request.name.as_deref()).await?;
    Ok(Json(department.into()))
}

/// DELETE /departments/{id} (Admin only)
async fn delete_department(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.departments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}
