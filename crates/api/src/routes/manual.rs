use axum::{
    Json,
    extract::{Path, State},
};

use voxform_services::orchestrator::event::{
    BatchOutcome, BatchRequest, StatusOutcome, TranscribeOutcome, TranscribeRequest,
};

use crate::{error::ApiError, state::AppState};

pub async fn transcribe(
    State(state): State<AppState>,
    Json(body): Json<TranscribeRequest>,
) -> Result<Json<TranscribeOutcome>, ApiError> {
    let outcome = state.orchestrator.transcribe(body).await?;
    Ok(Json(outcome))
}

pub async fn status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<StatusOutcome>, ApiError> {
    let outcome = state.orchestrator.status(&job_id).await?;
    Ok(Json(outcome))
}

pub async fn batch(
    State(state): State<AppState>,
    Json(body): Json<BatchRequest>,
) -> Result<Json<BatchOutcome>, ApiError> {
    if body.requests.is_empty() {
        return Err(ApiError::BadRequest("requests array is required".to_string()));
    }
    Ok(Json(state.orchestrator.transcribe_batch(body.requests).await))
}
