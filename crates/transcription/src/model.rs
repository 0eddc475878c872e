use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-reported job lifecycle. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Caller-supplied correlation data echoed back by the provider on
/// job details and callbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

/// One submitted job, tracked for the duration of a single request by its
/// provider-assigned identifier. There is no shared job table.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionJob {
    pub job_id: String,
    pub media_url: String,
    pub contact_email: String,
    pub question_label: String,
    pub metadata: JobMetadata,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
}

/// One transcribed token or punctuation mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub value: String,
    /// Seconds from media start. Punctuation elements carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TranscriptElement {
    pub fn is_text(&self) -> bool {
        self.element_type == "text"
    }
}

/// A contiguous speaker turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monologue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<i32>,
    #[serde(default)]
    pub elements: Vec<TranscriptElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub monologues: Vec<Monologue>,
}

impl Transcript {
    /// Renders the transcript as plain text: tokens separated by spaces,
    /// punctuation attached to the preceding token.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for monologue in &self.monologues {
            for element in &monologue.elements {
                if element.is_text() && !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&element.value);
            }
        }
        out
    }
}
