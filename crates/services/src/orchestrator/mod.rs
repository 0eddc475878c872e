pub mod event;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use voxform_config::Settings;
use voxform_transcription::media_quality::{MediaQualityEstimator, MediaQualityReport};
use voxform_transcription::{
    EnhancedTranscript, JobMetadata, JobStatus, QualityReport, SubmitOptions, Transcript,
    TranscriptionClient, TranscriptionError, TranscriptionJob, format, nlp,
};

use crate::report::CombinedQualityReport;
use crate::retry::RetryPolicy;
use crate::store::ResultStore;

use event::{
    Answer, AnswerError, BatchItem, BatchOutcome, CallbackOutcome, Form, StatusOutcome,
    TranscribeOutcome, TranscribeRequest, WebhookEvent, WebhookOutcome,
    first_validation_message,
};

const DEFAULT_QUESTION: &str = "Unknown Question";
const MANUAL_QUESTION: &str = "Manual request";

/// Pipeline conductor: turns webhook events, provider callbacks and manual
/// requests into submitted jobs, reconciles completion, merges the quality
/// signals and dispatches results to the store. Each invocation is
/// request-scoped; jobs are tracked only by their provider-assigned id.
pub struct JobOrchestrator {
    settings: Settings,
    client: TranscriptionClient,
    media: MediaQualityEstimator,
    store: Arc<dyn ResultStore>,
    retry: RetryPolicy,
}

impl JobOrchestrator {
    pub fn new(settings: Settings, store: Arc<dyn ResultStore>) -> Self {
        let client = TranscriptionClient::new(settings.provider.clone());
        Self {
            client,
            media: MediaQualityEstimator::new(),
            store,
            retry: RetryPolicy::default(),
            settings,
        }
    }

    /// Handles one form-response event. Every media-bearing answer is
    /// submitted independently; failures are collected per item and never
    /// abort the batch.
    pub async fn process_webhook(&self, event: WebhookEvent) -> WebhookOutcome {
        let contact_email = event.contact.as_ref().and_then(|c| c.email.clone());
        let contact_name = event.contact.as_ref().and_then(|c| c.name.clone());

        let mut answers: Vec<Answer> = event.answers.clone();
        if let Some(contact) = &event.contact {
            answers.extend(contact.answers.iter().cloned());
        }

        let mut errors = Vec::new();
        for answer in answers.iter().filter(|a| a.media_url.is_some()) {
            let media_url = answer.media_url.clone().unwrap_or_default();

            let Some(email) = contact_email.as_deref() else {
                errors.push(AnswerError {
                    media_url: Some(media_url),
                    error: "contact email missing from event".to_string(),
                });
                continue;
            };

            let question = resolve_question_label(event.form.as_ref(), answer);
            let metadata = JobMetadata {
                email: Some(email.to_string()),
                question: Some(question),
                interaction_id: event.interaction_id.clone(),
                answer_id: answer.answer_id.clone(),
                share_id: answer.share_id.clone(),
                answer_type: answer.answer_type.clone(),
                contact_name: contact_name.clone(),
            };
            let options = SubmitOptions {
                callback_url: self.settings.provider.callback_url.clone(),
                wait_for_completion: false,
            };

            match self.submit_with_retry(&media_url, &metadata, &options).await {
                Ok(job) => {
                    info!(
                        "transcription job {} submitted for {email} ({})",
                        job.job_id, job.question_label
                    );
                }
                Err(err) => {
                    warn!("webhook answer {media_url} not submitted: {err}");
                    errors.push(AnswerError {
                        media_url: Some(media_url),
                        error: error_message(err),
                    });
                }
            }
        }

        WebhookOutcome {
            status: "processed",
            errors,
        }
    }

    /// Handles a provider push notification. An embedded transcript is used
    /// as-is; otherwise a completed job's transcript is fetched before the
    /// merge-and-store step shared with the synchronous path.
    pub async fn process_callback(
        &self,
        payload: &serde_json::Value,
    ) -> Result<CallbackOutcome, TranscriptionError> {
        let event = self.client.parse_callback(payload)?;

        match event.status {
            JobStatus::Completed => {
                let transcript = match event.transcript {
                    Some(transcript) => transcript,
                    None => self.client.fetch_transcript(&event.job_id).await?,
                };

                let (enhanced, combined) =
                    self.evaluate(event.media_url.as_deref(), &transcript).await;
                let stored = self
                    .store_result(&event.metadata, event.media_url.as_deref(), &enhanced, &combined)
                    .await;

                Ok(CallbackOutcome {
                    job_id: event.job_id,
                    status: event.status,
                    stored,
                    error: None,
                })
            }
            JobStatus::Failed => {
                let detail = event
                    .failure_detail
                    .unwrap_or_else(|| "provider reported failure".to_string());
                warn!("transcription job {} failed: {detail}", event.job_id);
                Ok(CallbackOutcome {
                    job_id: event.job_id,
                    status: event.status,
                    stored: false,
                    error: Some(detail),
                })
            }
            status => {
                // Progress notification; completion will arrive later.
                Ok(CallbackOutcome {
                    job_id: event.job_id,
                    status,
                    stored: false,
                    error: None,
                })
            }
        }
    }

    /// Manual submission, optionally blocking until the job completes. On
    /// completion the result goes through the same merge-and-store step as
    /// the callback path before returning to the caller.
    pub async fn transcribe(
        &self,
        request: TranscribeRequest,
    ) -> Result<TranscribeOutcome, TranscriptionError> {
        self.validate_request(&request)?;

        let question = request
            .question
            .clone()
            .unwrap_or_else(|| MANUAL_QUESTION.to_string());
        let metadata = JobMetadata {
            email: Some(request.email.clone()),
            question: Some(question),
            ..JobMetadata::default()
        };
        let options = SubmitOptions {
            callback_url: self.settings.provider.callback_url.clone(),
            wait_for_completion: request.wait_for_completion,
        };

        let job = self
            .submit_with_retry(&request.media_url, &metadata, &options)
            .await?;

        if !request.wait_for_completion {
            return Ok(TranscribeOutcome::Submitted {
                status: job.status,
                job_id: job.job_id,
                message: "Transcription job submitted successfully",
            });
        }

        let max_wait = Duration::from_secs(
            request
                .max_wait_time
                .unwrap_or(self.settings.provider.max_wait_secs),
        );
        let details = self.client.wait_for_completion(&job.job_id, max_wait).await?;
        let transcript = self.client.fetch_transcript(&job.job_id).await?;

        let media_url = details.media_url.clone().unwrap_or(job.media_url.clone());
        let (enhanced, combined) = self.evaluate(Some(&media_url), &transcript).await;
        let stored = self
            .store_result(&job.metadata, Some(&media_url), &enhanced, &combined)
            .await;

        Ok(TranscribeOutcome::Completed {
            status: JobStatus::Completed,
            job_id: job.job_id,
            transcript: enhanced.enhanced_text,
            quality_metrics: combined,
            stored,
        })
    }

    /// Read-only status lookup; completed jobs come back with the enhanced
    /// transcript and combined metrics, without touching the store.
    pub async fn status(&self, job_id: &str) -> Result<StatusOutcome, TranscriptionError> {
        let details = self.client.poll_status(job_id).await?;

        if details.status != JobStatus::Completed {
            return Ok(StatusOutcome::Pending {
                status: details.status,
                job_id: details.id,
            });
        }

        let transcript = self.client.fetch_transcript(job_id).await?;
        let (enhanced, combined) = self.evaluate(details.media_url.as_deref(), &transcript).await;

        Ok(StatusOutcome::Completed {
            status: JobStatus::Completed,
            transcript: enhanced.enhanced_text,
            quality_metrics: combined,
        })
    }

    /// Batch submission: items validate and submit independently and the
    /// outcome reports per-item errors next to successful job ids.
    pub async fn transcribe_batch(&self, requests: Vec<TranscribeRequest>) -> BatchOutcome {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            if let Err(err) = self.validate_request(&request) {
                results.push(BatchItem::Error {
                    media_url: (!request.media_url.is_empty()).then(|| request.media_url.clone()),
                    error: error_message(err),
                    status: "error",
                });
                continue;
            }

            let question = request
                .question
                .clone()
                .unwrap_or_else(|| "Batch request".to_string());
            let metadata = JobMetadata {
                email: Some(request.email.clone()),
                question: Some(question),
                ..JobMetadata::default()
            };
            let options = SubmitOptions {
                callback_url: self.settings.provider.callback_url.clone(),
                wait_for_completion: false,
            };

            match self
                .submit_with_retry(&request.media_url, &metadata, &options)
                .await
            {
                Ok(job) => results.push(BatchItem::Submitted {
                    media_url: request.media_url,
                    job_id: job.job_id,
                    status: job.status,
                }),
                Err(err) => results.push(BatchItem::Error {
                    media_url: Some(request.media_url),
                    error: error_message(err),
                    status: "error",
                }),
            }
        }

        let failed = results
            .iter()
            .filter(|item| matches!(item, BatchItem::Error { .. }))
            .count();
        BatchOutcome {
            total: results.len(),
            failed,
            results,
        }
    }

    /// Acoustic quality report for a job: status poll plus media probe, and
    /// the full confidence metrics once the transcript exists.
    pub async fn transcript_quality(
        &self,
        job_id: &str,
    ) -> Result<QualityReport, TranscriptionError> {
        let details = self.client.poll_status(job_id).await?;

        let media_quality = match details.media_url.as_deref() {
            Some(url) => self.media.estimate(url).await,
            None => MediaQualityReport::unknown("Media URL not found in job details"),
        };

        if details.status != JobStatus::Completed {
            return Ok(QualityReport::pending(details.status, media_quality));
        }

        let transcript = self.client.fetch_transcript(job_id).await?;
        Ok(QualityReport::completed(&transcript, media_quality))
    }

    async fn submit_with_retry(
        &self,
        media_url: &str,
        metadata: &JobMetadata,
        options: &SubmitOptions,
    ) -> Result<TranscriptionJob, TranscriptionError> {
        let details = self
            .retry
            .run("job submission", || {
                self.client.submit(
                    media_url,
                    metadata,
                    options,
                    &self.settings.media.supported_formats,
                )
            })
            .await?;

        Ok(TranscriptionJob {
            job_id: details.id,
            media_url: media_url.to_string(),
            contact_email: metadata.email.clone().unwrap_or_default(),
            question_label: metadata
                .question
                .clone()
                .unwrap_or_else(|| DEFAULT_QUESTION.to_string()),
            metadata: metadata.clone(),
            status: details.status,
            submitted_at: Utc::now(),
        })
    }

    /// Runs the text analyzer and the acoustic scorer over one completed
    /// transcript and merges both into the stored quality object.
    async fn evaluate(
        &self,
        media_url: Option<&str>,
        transcript: &Transcript,
    ) -> (EnhancedTranscript, CombinedQualityReport) {
        let enhanced = nlp::analyze_and_enhance(&transcript.plain_text());

        let media_quality = match media_url {
            Some(url) => self.media.estimate(url).await,
            None => MediaQualityReport::unknown("Media URL not found in job details"),
        };
        let acoustic = QualityReport::completed(transcript, media_quality);
        let combined = CombinedQualityReport::merge(acoustic, &enhanced);

        (enhanced, combined)
    }

    async fn store_result(
        &self,
        metadata: &JobMetadata,
        media_url: Option<&str>,
        enhanced: &EnhancedTranscript,
        combined: &CombinedQualityReport,
    ) -> bool {
        let Some(email) = metadata.email.as_deref() else {
            warn!("result not stored: job metadata carries no contact email");
            return false;
        };
        let question = metadata.question.as_deref().unwrap_or(DEFAULT_QUESTION);

        self.store
            .upsert(
                email,
                question,
                media_url.unwrap_or_default(),
                &enhanced.enhanced_text,
                combined,
            )
            .await
    }

    fn validate_request(&self, request: &TranscribeRequest) -> Result<(), TranscriptionError> {
        request
            .validate()
            .map_err(|errors| TranscriptionError::Validation(first_validation_message(&errors)))?;
        format::validate_media_format(&request.media_url, &self.settings.media.supported_formats)
            .map_err(TranscriptionError::Validation)
    }
}

fn resolve_question_label(form: Option<&Form>, answer: &Answer) -> String {
    if let (Some(form), Some(question_id)) = (form, answer.question_id.as_deref()) {
        let labeled = form
            .questions
            .iter()
            .find(|q| q.question_id.as_deref() == Some(question_id))
            .and_then(|q| q.metadata.as_ref())
            .and_then(|m| m.text.clone());
        if let Some(label) = labeled {
            return label;
        }
    }
    answer
        .poll_option_content
        .clone()
        .unwrap_or_else(|| DEFAULT_QUESTION.to_string())
}

/// Per-item error strings stay bare; the enum prefixes are for logs.
fn error_message(err: TranscriptionError) -> String {
    match err {
        TranscriptionError::Validation(message) | TranscriptionError::Configuration(message) => {
            message
        }
        other => other.to_string(),
    }
}
