use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use voxform_config::StoreSettings;

use crate::report::CombinedQualityReport;
use crate::store::ResultStore;

#[derive(Debug, Error)]
enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ValueUpdate<'a> {
    values: [[&'a str; 1]; 1],
}

/// Spreadsheet-backed result store over the values REST API.
///
/// Rows are located by a linear scan of the email column; a miss appends at
/// the next free index. The read-then-append resolution is not protected
/// against concurrent writers for the same new contact, so two simultaneous
/// jobs can race to create duplicate rows. The values API offers no
/// conditional write to close that window.
pub struct SheetsStore {
    settings: StoreSettings,
    client: reqwest::Client,
}

impl SheetsStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.settings.base_url,
            self.settings.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn read_column(&self, column: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let range = format!("{}!{column}:{column}", self.settings.sheet_name);
        let response = self
            .client
            .get(self.values_url(&range))
            .bearer_auth(&self.settings.api_token)
            .send()
            .await?
            .error_for_status()?;

        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }

    /// 1-based row of the first email match, if any.
    async fn find_email_row(&self, email: &str) -> Result<Option<usize>, StoreError> {
        let rows = self.read_column(&self.settings.email_column).await?;
        Ok(rows
            .iter()
            .position(|row| row.first().is_some_and(|cell| cell == email))
            .map(|idx| idx + 1))
    }

    /// Next free 1-based row index, judged by the first column's extent.
    async fn next_free_row(&self) -> Result<usize, StoreError> {
        let rows = self.read_column("A").await?;
        Ok(rows.len() + 1)
    }

    async fn write_cell(&self, column: &str, row: usize, value: &str) -> Result<(), StoreError> {
        let range = format!("{}!{column}{row}", self.settings.sheet_name);
        self.client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.settings.api_token)
            .json(&ValueUpdate { values: [[value]] })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn try_upsert(
        &self,
        contact_email: &str,
        link_column: &str,
        transcript_column: &str,
        media_url: &str,
        transcript_with_notes: &str,
    ) -> Result<usize, StoreError> {
        let row = match self.find_email_row(contact_email).await? {
            Some(row) => row,
            None => self.next_free_row().await?,
        };

        self.write_cell(link_column, row, media_url).await?;
        self.write_cell(transcript_column, row, transcript_with_notes)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl ResultStore for SheetsStore {
    async fn upsert(
        &self,
        contact_email: &str,
        question_label: &str,
        media_url: &str,
        transcript_text: &str,
        quality: &CombinedQualityReport,
    ) -> bool {
        let Some(columns) = self.settings.question_columns.get(question_label) else {
            warn!("no column mapping for question: {question_label}");
            return false;
        };

        let transcript_with_notes =
            format!("{transcript_text}{}", quality_note(quality)).trim_end().to_string();

        match self
            .try_upsert(
                contact_email,
                &columns.link_column,
                &columns.transcript_column,
                media_url,
                &transcript_with_notes,
            )
            .await
        {
            Ok(row) => {
                info!("stored transcript for {contact_email} ({question_label}) at row {row}");
                true
            }
            Err(err) => {
                error!("failed to store transcript for {contact_email}: {err}");
                false
            }
        }
    }
}

/// Human-readable footer appended below the stored transcript.
fn quality_note(quality: &CombinedQualityReport) -> String {
    let confidence = quality.acoustic.overall_confidence;
    let warnings = &quality.acoustic.warnings;
    if confidence.is_none() && warnings.is_empty() {
        return String::new();
    }

    let mut note = String::from("\n\nQuality Notes:\n");
    if let Some(confidence) = confidence {
        note.push_str(&format!("- Confidence: {:.2}%\n", confidence * 100.0));
    }
    for warning in warnings {
        note.push_str(&format!("- {warning}\n"));
    }
    note
}
