//! Handlers for person endpoints and person statistics.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::pagination::FilterParams;
use crate::api::dto::person::{
    CreatePersonRequest, PersonDetailResponse, PersonResponse, UpdatePersonRequest,
};
use crate::api::extract::{AppPath, AppQuery, ValidJson};
use crate::domain::entities::{MoscowPersonsStats, PersonsBreakdown, PersonsStats};
use crate::error::AppError;
use crate::state::AppState;

/// Top OKOPF, OKVED and MPK groups by number of owned patents.
///
/// # Endpoint
///
/// `GET /persons`
///
/// # Response
///
/// ```json
/// {
///   "okopf_stats": [{ "name": "12300", "count": 410 }, { "name": "Остальные", "count": 57 }],
///   "okvad_stats": [...],
///   "mpk_stats": [...]
/// }
/// ```
pub async fn persons_breakdown_handler(
    State(state): State<AppState>,
) -> Result<Json<PersonsBreakdown>, AppError> {
    Ok(Json(state.person_service.breakdown().await?))
}

/// `GET /persons/all_stats?filter_id=`
pub async fn persons_all_stats_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FilterParams>,
) -> Result<Json<PersonsStats>, AppError> {
    Ok(Json(state.person_service.all_stats(params.filter_id).await?))
}

/// Same as `all_stats` restricted to Moscow, plus cluster and support shares.
///
/// `GET /persons/msk_stats?filter_id=`
pub async fn persons_msk_stats_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FilterParams>,
) -> Result<Json<MoscowPersonsStats>, AppError> {
    Ok(Json(
        state.person_service.moscow_stats(params.filter_id).await?,
    ))
}

/// `POST /persons`
pub async fn create_person_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreatePersonRequest>,
) -> Result<(StatusCode, Json<PersonResponse>), AppError> {
    let person = state.person_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(person.into())))
}

/// `GET /persons/{tax_number}`
pub async fn get_person_handler(
    State(state): State<AppState>,
    AppPath(tax_number): AppPath<String>,
) -> Result<Json<PersonDetailResponse>, AppError> {
    let full = state.person_service.get(&tax_number).await?;
    Ok(Json(full.into()))
}

/// `PATCH /persons/{tax_number}`
pub async fn update_person_handler(
    State(state): State<AppState>,
    AppPath(tax_number): AppPath<String>,
    ValidJson(payload): ValidJson<UpdatePersonRequest>,
) -> Result<Json<PersonResponse>, AppError> {
    let person = state
        .person_service
        .update(&tax_number, payload.into())
        .await?;
    Ok(Json(person.into()))
}

/// `DELETE /persons/{tax_number}`
pub async fn delete_person_handler(
    State(state): State<AppState>,
    AppPath(tax_number): AppPath<String>,
) -> Result<StatusCode, AppError> {
    state.person_service.delete(&tax_number).await?;
    Ok(StatusCode::NO_CONTENT)
}
