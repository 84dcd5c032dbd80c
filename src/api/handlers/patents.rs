//! Handlers for patent endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::pagination::{FilterParams, PatentListParams};
use crate::api::dto::patent::{
    CreatePatentRequest, PatentListResponse, PatentResponse, UpdatePatentRequest,
};
use crate::api::extract::{AppPath, AppQuery, ValidJson};
use crate::domain::entities::{PatentKey, PatentQuery, PatentsStats};
use crate::error::AppError;
use crate::state::AppState;

/// Lists patents with their holders, one page at a time.
///
/// # Endpoint
///
/// `GET /patents?page=1&pagesize=10&filter_id=&kind=&actual=`
///
/// # Response
///
/// ```json
/// { "total": 125, "items": [ { "kind": 1, "reg_number": 2750001, "patent_holders": [...] } ] }
/// ```
///
/// # Errors
///
/// - 400 on invalid pagination
/// - 404 if `filter_id` names no filter
pub async fn list_patents_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PatentListParams>,
) -> Result<Json<PatentListResponse>, AppError> {
    let (offset, limit) = params.pagination.offset_limit()?;
    let query = PatentQuery::from(params.selection);

    let (total, items) = state.patent_service.list(&query, offset, limit).await?;

    Ok(Json(PatentListResponse {
        total,
        items: items.into_iter().map(PatentResponse::from).collect(),
    }))
}

/// `GET /patents/stats?filter_id=`
pub async fn patents_stats_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FilterParams>,
) -> Result<Json<PatentsStats>, AppError> {
    let stats = state.patent_service.stats(params.filter_id).await?;
    Ok(Json(stats))
}

/// `POST /patents`
pub async fn create_patent_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreatePatentRequest>,
) -> Result<(StatusCode, Json<PatentResponse>), AppError> {
    let patent = state.patent_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(patent.into())))
}

/// `GET /patents/{kind}/{reg_number}`
pub async fn get_patent_handler(
    State(state): State<AppState>,
    AppPath((kind, reg_number)): AppPath<(i32, i32)>,
) -> Result<Json<PatentResponse>, AppError> {
    let full = state
        .patent_service
        .get(PatentKey::new(kind, reg_number))
        .await?;
    Ok(Json(full.into()))
}

/// Partially updates a patent.
///
/// # Endpoint
///
/// `PATCH /patents/{kind}/{reg_number}`
///
/// Absent fields are unchanged; `null` clears nullable fields. `kind` and
/// `reg_number` may be changed, and ownership links follow the new key.
pub async fn update_patent_handler(
    State(state): State<AppState>,
    AppPath((kind, reg_number)): AppPath<(i32, i32)>,
    ValidJson(payload): ValidJson<UpdatePatentRequest>,
) -> Result<Json<PatentResponse>, AppError> {
    let patent = state
        .patent_service
        .update(PatentKey::new(kind, reg_number), payload.into())
        .await?;
    Ok(Json(patent.into()))
}

/// `DELETE /patents/{kind}/{reg_number}`
pub async fn delete_patent_handler(
    State(state): State<AppState>,
    AppPath((kind, reg_number)): AppPath<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    state
        .patent_service
        .delete(PatentKey::new(kind, reg_number))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
