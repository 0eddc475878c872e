use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::warn;

use voxform_services::orchestrator::event::WebhookEvent;

use crate::{error::ApiError, state::AppState};

/// Single inbound notification endpoint. Provider callbacks arrive wrapped
/// in a `job` envelope; everything else is treated as a survey-platform
/// form-response event. Both paths answer 200 with embedded per-item errors
/// so the sender does not retry-storm.
pub async fn receive(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if payload.get("job").is_some() {
        let outcome = match state.orchestrator.process_callback(&payload).await {
            Ok(outcome) => serde_json::to_value(outcome)
                .map_err(|e| ApiError::Internal(e.to_string()))?,
            Err(err) => {
                warn!("callback processing failed: {err}");
                json!({
                    "status": "error",
                    "errors": [{ "error": err.to_string() }],
                })
            }
        };
        return Ok(Json(outcome));
    }

    let event: WebhookEvent = serde_json::from_value(payload)
        .map_err(|e| ApiError::BadRequest(format!("malformed webhook payload: {e}")))?;
    let outcome = state.orchestrator.process_webhook(event).await;
    Ok(Json(
        serde_json::to_value(outcome).map_err(|e| ApiError::Internal(e.to_string()))?,
    ))
}
