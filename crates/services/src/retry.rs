use std::future::Future;
use std::time::Duration;

use tracing::warn;

use voxform_transcription::TranscriptionError;

/// Retry schedule applied around individual outbound calls. The defaults
/// give three attempts with 1s/2s exponential backoff between them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub retry_on: fn(&TranscriptionError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2,
            retry_on: TranscriptionError::is_transient,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay * self.backoff_factor.pow(attempt)
    }

    /// Runs `operation` until it succeeds, fails permanently, or exhausts
    /// the schedule. The final error is returned unchanged.
    pub async fn run<T, F, Fut>(
        &self,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T, TranscriptionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TranscriptionError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt + 1 < self.max_attempts && (self.retry_on)(&err) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{operation_name} attempt {}/{} failed: {err}. Retrying in {delay:?}",
                        attempt + 1,
                        self.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
