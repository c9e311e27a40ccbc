//! Dataset Routes
//!
//! - POST /api/v1/dataset?file_name= - Upload a spreadsheet (raw body bytes)
//! - DELETE /api/v1/dataset - Drop the upload, fall back to the default path
//! - GET /api/v1/dataset - Active dataset summary
//! - GET /api/v1/years - Ordered school years

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DatasetResponse, UploadParams, YearsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dataset::DatasetSource;
use crate::views::Dashboard;

/// POST /api/v1/dataset
///
/// Loads the body as a spreadsheet named `file_name`. On success the upload
/// becomes the active dataset; on failure the previous source stays active.
pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UploadParams>, QueryRejection>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<DatasetResponse>)> {
    let Query(params) = query?;
    let file_name = params.file_name.trim();
    if file_name.is_empty() {
        return Err(ApiError::Validation("file_name must not be empty".to_string()));
    }
    if body.is_empty() {
        return Err(ApiError::Validation("Uploaded file is empty".to_string()));
    }
    if body.len() > state.max_upload_bytes {
        return Err(ApiError::Validation(format!(
            "Uploaded file exceeds {} bytes",
            state.max_upload_bytes
        )));
    }

    let source = DatasetSource::upload(file_name, body.to_vec());
    let dataset = state.replace_upload(source.clone()).await?;

    let dashboard = Dashboard::new(&dataset, &state.regions, &state.sectors);
    Ok((
        StatusCode::CREATED,
        Json(DatasetResponse {
            uploaded: true,
            summary: dashboard.summary(source.to_string()),
        }),
    ))
}

/// DELETE /api/v1/dataset
pub async fn clear_dataset(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.clear_upload().await {
        tracing::info!("Upload dropped, using {}", state.default_source);
    }
    StatusCode::NO_CONTENT
}

/// GET /api/v1/dataset
pub async fn get_dataset(State(state): State<Arc<AppState>>) -> ApiResult<Json<DatasetResponse>> {
    let (source, dataset) = state.load_active().await?;
    let dashboard = Dashboard::new(&dataset, &state.regions, &state.sectors);

    Ok(Json(DatasetResponse {
        uploaded: source.is_upload(),
        summary: dashboard.summary(source.to_string()),
    }))
}

/// GET /api/v1/years
pub async fn list_years(State(state): State<Arc<AppState>>) -> ApiResult<Json<YearsResponse>> {
    let (_, dataset) = state.load_active().await?;
    let years = crate::prepare::ordered_years(&dataset);
    Ok(Json(YearsResponse::new(years)))
}
