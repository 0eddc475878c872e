use serde::Serialize;

use voxform_transcription::{EnhancedTranscript, LinguisticAnalysis, QualityReport};

/// The stored quality object: acoustic confidence metrics merged with the
/// linguistic signals derived from the enhanced transcript.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedQualityReport {
    #[serde(flatten)]
    pub acoustic: QualityReport,
    pub linguistic_quality_score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enhancement_warnings: Vec<String>,
    pub content_analysis: LinguisticAnalysis,
}

impl CombinedQualityReport {
    pub fn merge(acoustic: QualityReport, enhanced: &EnhancedTranscript) -> Self {
        Self {
            acoustic,
            linguistic_quality_score: enhanced.quality_score,
            enhancement_warnings: enhanced.enhancement_warnings.clone(),
            content_analysis: enhanced.content_analysis.clone(),
        }
    }
}
