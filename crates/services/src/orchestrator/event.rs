use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use voxform_transcription::JobStatus;

use crate::report::CombinedQualityReport;

/// Survey-platform form-response event. Answers have been observed both at
/// the event top level and nested under the contact, so both are read.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub interaction_id: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub form: Option<Form>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(rename = "type", default)]
    pub answer_type: Option<String>,
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub answer_id: Option<String>,
    #[serde(default)]
    pub share_id: Option<String>,
    #[serde(default)]
    pub poll_option_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<QuestionMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionMetadata {
    #[serde(default)]
    pub text: Option<String>,
}

/// Webhook handling always reports per-answer failures instead of failing
/// the request, so the platform does not retry-storm.
#[derive(Debug, Serialize)]
pub struct WebhookOutcome {
    pub status: &'static str,
    pub errors: Vec<AnswerError>,
}

#[derive(Debug, Serialize)]
pub struct AnswerError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackOutcome {
    pub job_id: String,
    pub status: JobStatus,
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Manual submission request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranscribeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "media_url is required"))]
    pub media_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub wait_for_completion: bool,
    #[serde(default)]
    pub max_wait_time: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub requests: Vec<TranscribeRequest>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TranscribeOutcome {
    Completed {
        status: JobStatus,
        job_id: String,
        transcript: String,
        quality_metrics: CombinedQualityReport,
        stored: bool,
    },
    Submitted {
        status: JobStatus,
        job_id: String,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusOutcome {
    Completed {
        status: JobStatus,
        transcript: String,
        quality_metrics: CombinedQualityReport,
    },
    Pending { status: JobStatus, job_id: String },
}

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<BatchItem>,
    pub total: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Submitted {
        media_url: String,
        job_id: String,
        status: JobStatus,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        media_url: Option<String>,
        error: String,
        status: &'static str,
    },
}

/// First human-readable message out of a validator error set.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let by_field = errors.field_errors();
    // Check fields in declaration order so combined failures report the
    // earliest one deterministically.
    for field in ["media_url", "email"] {
        if let Some(message) = by_field
            .get(field)
            .and_then(|errs| errs.iter().find_map(|e| e.message.as_ref()))
        {
            return message.to_string();
        }
    }
    "invalid request".to_string()
}
