use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider request failed: {detail}")]
    Provider {
        /// HTTP status when the provider answered; `None` for transport failures.
        status: Option<u16>,
        detail: String,
    },

    #[error("Timed out after {waited_secs}s waiting for job {job_id}")]
    Timeout { job_id: String, waited_secs: u64 },

    #[error("Transcription job {job_id} failed: {detail}")]
    JobFailed { job_id: String, detail: String },
}

impl TranscriptionError {
    pub fn transport(context: &str, err: reqwest::Error) -> Self {
        Self::Provider {
            status: None,
            detail: format!("{context}: {err}"),
        }
    }

    /// Transient failures are worth retrying: transport errors and 5xx
    /// provider responses. 4xx responses, validation and configuration
    /// problems are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider { status, .. } => match status {
                None => true,
                Some(code) => *code >= 500,
            },
            _ => false,
        }
    }
}
