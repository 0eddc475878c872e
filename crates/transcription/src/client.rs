use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use voxform_config::ProviderSettings;

use crate::error::TranscriptionError;
use crate::format;
use crate::model::{JobMetadata, JobStatus, Transcript};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How the caller intends to learn about job completion. Submissions with
/// neither a callback nor a synchronous wait would leak jobs, so `submit`
/// rejects that combination up front.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub callback_url: Option<String>,
    pub wait_for_completion: bool,
}

#[derive(Serialize)]
struct SubmitJobRequest<'a> {
    media_url: &'a str,
    metadata: &'a JobMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_config: Option<NotificationConfig<'a>>,
}

#[derive(Serialize)]
struct NotificationConfig<'a> {
    url: &'a str,
    method: &'static str,
}

/// Provider view of a job, returned by submission and status polls.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDetails {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<JobMetadata>,
    #[serde(default)]
    pub failure_detail: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallbackPayload {
    job: CallbackJob,
}

#[derive(Debug, Deserialize)]
struct CallbackJob {
    #[serde(default)]
    id: Option<String>,
    status: JobStatus,
    #[serde(default)]
    media_url: Option<String>,
    #[serde(default)]
    metadata: Option<JobMetadata>,
    #[serde(default)]
    failure_detail: Option<String>,
    #[serde(default)]
    transcript: Option<Transcript>,
}

/// Parsed push notification. `transcript` is present when the provider
/// chose to embed it; otherwise a completed job's transcript must be
/// fetched separately.
#[derive(Debug)]
pub struct CallbackEvent {
    pub job_id: String,
    pub status: JobStatus,
    pub media_url: Option<String>,
    pub metadata: JobMetadata,
    pub failure_detail: Option<String>,
    pub transcript: Option<Transcript>,
}

/// Speech-to-text provider client: job submission, status polling,
/// transcript retrieval and push-callback parsing.
pub struct TranscriptionClient {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new(settings: ProviderSettings) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { settings, client }
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.poll_interval_secs)
    }

    fn ensure_credential(&self) -> Result<(), TranscriptionError> {
        if self.settings.api_key.is_empty() {
            return Err(TranscriptionError::Configuration(
                "provider API credential is not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Submits a transcription job, embedding caller metadata for later
    /// correlation on polls and callbacks.
    pub async fn submit(
        &self,
        media_url: &str,
        metadata: &JobMetadata,
        options: &SubmitOptions,
        supported_formats: &std::collections::HashSet<String>,
    ) -> Result<JobDetails, TranscriptionError> {
        format::validate_media_format(media_url, supported_formats)
            .map_err(TranscriptionError::Validation)?;
        self.ensure_credential()?;

        if options.callback_url.is_none() && !options.wait_for_completion {
            return Err(TranscriptionError::Configuration(
                "no completion path: configure a callback URL or request synchronous wait"
                    .to_string(),
            ));
        }

        let request = SubmitJobRequest {
            media_url,
            metadata,
            notification_config: options.callback_url.as_deref().map(|url| {
                NotificationConfig {
                    url,
                    method: "POST",
                }
            }),
        };

        let response = self
            .client
            .post(format!("{}/jobs", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranscriptionError::transport("job submission", e))?;

        if !response.status().is_success() {
            return Err(Self::provider_error("job submission", response).await);
        }

        let details: JobDetails = response
            .json()
            .await
            .map_err(|e| TranscriptionError::transport("job submission response", e))?;
        info!(
            "submitted transcription job {} for {media_url}",
            details.id
        );
        Ok(details)
    }

    /// Single synchronous status fetch.
    pub async fn poll_status(&self, job_id: &str) -> Result<JobDetails, TranscriptionError> {
        self.ensure_credential()?;

        let response = self
            .client
            .get(format!("{}/jobs/{job_id}", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .send()
            .await
            .map_err(|e| TranscriptionError::transport("status poll", e))?;

        if !response.status().is_success() {
            return Err(Self::provider_error("status poll", response).await);
        }

        response
            .json()
            .await
            .map_err(|e| TranscriptionError::transport("status poll response", e))
    }

    /// Fetches the transcript of a completed job. The provider rejects the
    /// call for jobs in any other state.
    pub async fn fetch_transcript(&self, job_id: &str) -> Result<Transcript, TranscriptionError> {
        self.ensure_credential()?;

        let response = self
            .client
            .get(format!("{}/jobs/{job_id}/transcript", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .send()
            .await
            .map_err(|e| TranscriptionError::transport("transcript fetch", e))?;

        if !response.status().is_success() {
            return Err(Self::provider_error("transcript fetch", response).await);
        }

        response
            .json()
            .await
            .map_err(|e| TranscriptionError::transport("transcript response", e))
    }

    /// Parses a provider push notification into a `CallbackEvent`.
    pub fn parse_callback(
        &self,
        payload: &serde_json::Value,
    ) -> Result<CallbackEvent, TranscriptionError> {
        let parsed: CallbackPayload =
            serde_json::from_value(payload.clone()).map_err(|e| TranscriptionError::Provider {
                status: None,
                detail: format!("malformed callback payload: {e}"),
            })?;

        let job = parsed.job;
        let job_id = job.id.ok_or_else(|| TranscriptionError::Provider {
            status: None,
            detail: "callback payload lacks a job identifier".to_string(),
        })?;

        Ok(CallbackEvent {
            job_id,
            status: job.status,
            media_url: job.media_url,
            metadata: job.metadata.unwrap_or_default(),
            failure_detail: job.failure_detail,
            transcript: job.transcript,
        })
    }

    /// Polls at a fixed interval until the job reaches a terminal state or
    /// the wait ceiling elapses.
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        max_wait: Duration,
    ) -> Result<JobDetails, TranscriptionError> {
        let interval = self.poll_interval();
        let deadline = Instant::now() + max_wait;

        loop {
            let details = self.poll_status(job_id).await?;
            match details.status {
                JobStatus::Completed => return Ok(details),
                JobStatus::Failed => {
                    return Err(TranscriptionError::JobFailed {
                        job_id: job_id.to_string(),
                        detail: details
                            .failure_detail
                            .unwrap_or_else(|| "provider reported failure".to_string()),
                    });
                }
                status => {
                    debug!("job {job_id} still {status:?}");
                }
            }

            if Instant::now() + interval > deadline {
                return Err(TranscriptionError::Timeout {
                    job_id: job_id.to_string(),
                    waited_secs: max_wait.as_secs(),
                });
            }
            sleep(interval).await;
        }
    }

    async fn provider_error(context: &str, response: reqwest::Response) -> TranscriptionError {
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        TranscriptionError::Provider {
            status: Some(status),
            detail: format!("{context}: HTTP {status}: {detail}"),
        }
    }
}
