//! Handlers for bulk patent transfer: CSV export and upload.

use axum::{
    Json,
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::dto::pagination::PatentSelectionParams;
use crate::api::dto::patent::UploadResponse;
use crate::api::extract::AppQuery;
use crate::domain::entities::PatentQuery;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::csv_codec::read_patents;

const EXPORT_FILENAME: &str = "patents_export.csv";

/// Exports the selected patents as a CSV attachment.
///
/// # Endpoint
///
/// `GET /patents/export?filter_id=&actual=&kind=`
///
/// The export runs on the background worker. With no selection at all only
/// the first 10 000 patents are exported.
///
/// # Errors
///
/// - 404 if `filter_id` names no filter
/// - 503 if the export queue is full or the export times out
pub async fn export_patents_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PatentSelectionParams>,
) -> Result<impl IntoResponse, AppError> {
    let body = state
        .export_service
        .export(PatentQuery::from(params))
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}

/// Imports patents from an uploaded CSV file.
///
/// # Endpoint
///
/// `POST /uploadfile` (multipart, field `file`)
///
/// Rows are upserted by `(kind, reg_number)` in one transaction: either the
/// whole file is applied or nothing is.
///
/// # Errors
///
/// - 422 if the `file` field is missing or a row is malformed (the line is
///   reported in `details.line`)
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let invalid_upload = |e: axum::extract::multipart::MultipartError| {
        AppError::unprocessable("Invalid multipart upload", json!({ "reason": e.body_text() }))
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(invalid_upload)?;

        let patents = read_patents(&data).map_err(|e| {
            AppError::unprocessable(
                format!("Invalid CSV: {}", e.message),
                json!({ "line": e.line, "filename": filename }),
            )
        })?;

        let rows = patents.len();
        let imported = state.patent_service.import(patents).await?;
        tracing::info!(?filename, rows, imported, "upload processed");

        return Ok(Json(UploadResponse {
            message: "File processed successfully".to_string(),
            filename,
            imported,
        }));
    }

    Err(AppError::unprocessable(
        "Missing multipart field `file`",
        json!({ "field": "file" }),
    ))
}
