mod sheets;

pub use sheets::SheetsStore;

use async_trait::async_trait;

use crate::report::CombinedQualityReport;

/// Destination for finished transcripts, keyed by contact identity and
/// question. Implementations soft-fail: `false` means "not stored", and
/// callers must not treat it as a partial write.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn upsert(
        &self,
        contact_email: &str,
        question_label: &str,
        media_url: &str,
        transcript_text: &str,
        quality: &CombinedQualityReport,
    ) -> bool;
}
