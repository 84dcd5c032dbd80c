//! Handlers for person/patent ownership links.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::ownership::{
    CreateOwnershipRequest, OwnershipListParams, OwnershipResponse,
};
use crate::api::extract::{AppPath, AppQuery, ValidJson};
use crate::domain::entities::OwnershipQuery;
use crate::error::AppError;
use crate::state::AppState;

/// Links a person to a patent.
///
/// # Endpoint
///
/// `POST /ownerships`
///
/// # Errors
///
/// - 404 if the person or the patent does not exist
/// - 409 if the link already exists
pub async fn create_ownership_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateOwnershipRequest>,
) -> Result<(StatusCode, Json<OwnershipResponse>), AppError> {
    let ownership = state.ownership_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ownership.into())))
}

/// `GET /ownerships?person_tax_number=&patent_kind=&patent_reg_number=`
pub async fn list_ownerships_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<OwnershipListParams>,
) -> Result<Json<Vec<OwnershipResponse>>, AppError> {
    let links = state
        .ownership_service
        .list(&OwnershipQuery::from(params))
        .await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

/// `DELETE /ownerships/{id}`
pub async fn delete_ownership_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.ownership_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
