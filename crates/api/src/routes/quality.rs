use axum::{
    Json,
    extract::{Path, State},
};

use voxform_transcription::QualityReport;

use crate::{error::ApiError, state::AppState};

pub async fn check(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<QualityReport>, ApiError> {
    let report = state.orchestrator.transcript_quality(&job_id).await?;
    Ok(Json(report))
}
