//! Handlers for tax-number filters.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::filter::{CreateFilterRequest, FilterResponse, FilterSummaryResponse};
use crate::api::extract::{AppPath, ValidJson};
use crate::error::AppError;
use crate::state::AppState;

/// Stores a list of tax numbers that can scope listings and statistics.
///
/// # Endpoint
///
/// `POST /filters`
///
/// # Request Body
///
/// ```json
/// { "name": "Cluster members", "tax_numbers": ["7701234567", "500100732259"] }
/// ```
///
/// Entries are trimmed and de-duplicated. Each must have 10 or 12 digits.
pub async fn create_filter_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateFilterRequest>,
) -> Result<(StatusCode, Json<FilterResponse>), AppError> {
    let filter = state
        .filter_service
        .create(payload.name, payload.tax_numbers)
        .await?;
    Ok((StatusCode::CREATED, Json(filter.into())))
}

/// `GET /filters`
pub async fn list_filters_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FilterSummaryResponse>>, AppError> {
    let filters = state.filter_service.list().await?;
    Ok(Json(filters.into_iter().map(Into::into).collect()))
}

/// `GET /filters/{id}`
pub async fn get_filter_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<FilterResponse>, AppError> {
    Ok(Json(state.filter_service.get(id).await?.into()))
}

/// `DELETE /filters/{id}`
pub async fn delete_filter_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    state.filter_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
