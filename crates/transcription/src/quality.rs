use serde::Serialize;

use crate::media_quality::MediaQualityReport;
use crate::model::{JobStatus, Transcript};

/// Elements below this acoustic confidence are flagged individually.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.8;
/// Flagged-element fraction above which the transcript gets a warning.
const UNCERTAIN_FRACTION_THRESHOLD: f64 = 0.1;

const GOOD_CONFIDENCE: f64 = 0.9;
const FAIR_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Good,
    Fair,
    Poor,
}

/// One flagged low-confidence token.
#[derive(Debug, Clone, Serialize)]
pub struct LowConfidenceWord {
    pub word: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Acoustic quality metrics for one transcript, plus the media-probe
/// sub-report. Jobs that have not completed yield a status-only report
/// with the confidence fields absent.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_words: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_confidence_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_confidence_words: Option<Vec<LowConfidenceWord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<QualityRating>,
    pub media_quality: MediaQualityReport,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl QualityReport {
    /// Report for a job that has not reached `Completed`.
    pub fn pending(status: JobStatus, media_quality: MediaQualityReport) -> Self {
        Self {
            status,
            message: Some("Transcript not ready yet".to_string()),
            overall_confidence: None,
            total_words: None,
            low_confidence_count: None,
            low_confidence_words: None,
            quality_rating: None,
            media_quality,
            warnings: Vec::new(),
        }
    }

    /// Scores a completed transcript: accumulates per-word confidence across
    /// all monologues, flags low-confidence words, and derives the rating.
    pub fn completed(transcript: &Transcript, media_quality: MediaQualityReport) -> Self {
        let mut total_confidence = 0.0;
        let mut total_words = 0usize;
        let mut low_confidence_words = Vec::new();

        for monologue in &transcript.monologues {
            for element in monologue.elements.iter().filter(|e| e.is_text()) {
                total_words += 1;
                let confidence = element.confidence.unwrap_or(0.0);
                total_confidence += confidence;

                if confidence < LOW_CONFIDENCE_THRESHOLD {
                    low_confidence_words.push(LowConfidenceWord {
                        word: element.value.clone(),
                        confidence,
                        timestamp: element.ts,
                    });
                }
            }
        }

        let overall_confidence = if total_words > 0 {
            total_confidence / total_words as f64
        } else {
            0.0
        };

        let quality_rating = if overall_confidence > GOOD_CONFIDENCE {
            QualityRating::Good
        } else if overall_confidence > FAIR_CONFIDENCE {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        };

        let mut warnings = Vec::new();
        if overall_confidence < LOW_CONFIDENCE_THRESHOLD {
            warnings.push("Low overall confidence score".to_string());
        }
        if total_words > 0
            && low_confidence_words.len() as f64 / total_words as f64 > UNCERTAIN_FRACTION_THRESHOLD
        {
            warnings.push("High number of uncertain words".to_string());
        }

        Self {
            status: JobStatus::Completed,
            message: None,
            overall_confidence: Some(overall_confidence),
            total_words: Some(total_words),
            low_confidence_count: Some(low_confidence_words.len()),
            low_confidence_words: Some(low_confidence_words),
            quality_rating: Some(quality_rating),
            media_quality,
            warnings,
        }
    }
}
