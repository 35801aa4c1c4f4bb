//! Daily summary routes

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::Local;
use workforce_core::{CoreError, ValidationErrors};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{SummaryQuery, SummaryResponse};

/// GET /summaries?date=YYYY-MM-DD
async fn list_summaries(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<Vec<SummaryResponse>>, ApiError> {
    let Query(query) = query?;

    let date = query
        .parse_date()
        .map_err(|_| {
            CoreError::Validation(ValidationErrors::single(
                "date",
                "Date must be in the format yyyy-MM-dd",
            ))
        })?
        .unwrap_or_else(|| Local::now().date_naive());

    let records = state.summaries.summaries_for(date).await?;
    Ok(Json(records.into_iter().map(SummaryResponse::from).collect()))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/summaries", get(list_summaries))
}
