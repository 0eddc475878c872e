use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::format::{self, MediaType};

/// Assumed clip duration for bitrate estimation, in seconds. Survey answers
/// hover around this length and the probe has no real duration to work from.
const ASSUMED_DURATION_SECS: f64 = 180.0;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Estimated-bitrate bands in kbps: [high, medium, low].
const AUDIO_THRESHOLDS: &[(&str, [u32; 3])] = &[("mp3", [192, 128, 64]), ("aac", [256, 192, 128])];

/// Audio/video component bands in kbps: [(high_a, high_v), (med_a, med_v), (low_a, low_v)].
/// Video tiers compare the estimate against the summed components.
const VIDEO_THRESHOLDS: &[(&str, [(u32, u32); 3])] =
    &[("mp4", [(192, 2000), (128, 1000), (96, 500)])];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    High,
    Medium,
    Low,
    Unknown,
}

/// Minimum bitrate recommended for a usable transcription.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum RecommendedBitrate {
    Audio { kbps: u32 },
    AudioVideo { audio_kbps: u32, video_kbps: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaQualityReport {
    pub tier: QualityTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_bitrate_kbps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_minimum: Option<RecommendedBitrate>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl MediaQualityReport {
    pub fn unknown(warning: impl Into<String>) -> Self {
        Self {
            tier: QualityTier::Unknown,
            media_type: None,
            format: None,
            estimated_bitrate_kbps: None,
            recommended_minimum: None,
            warnings: vec![warning.into()],
        }
    }
}

/// Probes remote media headers and derives a coarse quality tier.
///
/// The estimate reads `content-length` from a metadata-only request and
/// assumes a fixed clip duration, so the resulting bitrate is indicative,
/// never exact. All failures degrade to an Unknown-tier report.
pub struct MediaQualityEstimator {
    client: reqwest::Client,
}

impl MediaQualityEstimator {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    pub async fn estimate(&self, media_url: &str) -> MediaQualityReport {
        let Some(extension) = format::file_extension(media_url) else {
            return MediaQualityReport::unknown("Could not determine media type");
        };
        let Some(media_type) = format::media_kind(&extension) else {
            return MediaQualityReport::unknown("Could not determine media type");
        };

        let content_length = match self.probe_content_length(media_url).await {
            Ok(len) => len,
            Err(err) => {
                warn!("media quality probe failed for {media_url}: {err}");
                return MediaQualityReport::unknown("Could not analyze media quality");
            }
        };

        let estimated_bitrate = estimate_bitrate_kbps(content_length);
        debug!(
            "media probe {media_url}: {content_length} bytes, ~{estimated_bitrate:.0} kbps ({media_type}/{extension})"
        );

        classify(media_type, &extension, estimated_bitrate)
    }

    async fn probe_content_length(&self, media_url: &str) -> Result<u64, reqwest::Error> {
        let response = self
            .client
            .head(media_url)
            .send()
            .await?
            .error_for_status()?;

        let length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        Ok(length)
    }
}

impl Default for MediaQualityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// `content_length * 8 / duration`, in kbps.
pub fn estimate_bitrate_kbps(content_length: u64) -> f64 {
    (content_length as f64 * 8.0) / (ASSUMED_DURATION_SECS * 1000.0)
}

/// Maps an estimated bitrate to a tier via the per-format threshold tables.
/// Formats with no table entry stay Unknown.
pub fn classify(media_type: MediaType, format: &str, estimated_bitrate: f64) -> MediaQualityReport {
    let mut report = MediaQualityReport {
        tier: QualityTier::Unknown,
        media_type: Some(media_type),
        format: Some(format.to_string()),
        estimated_bitrate_kbps: Some(estimated_bitrate),
        recommended_minimum: None,
        warnings: Vec::new(),
    };

    match media_type {
        MediaType::Audio => {
            let Some((_, bands)) = AUDIO_THRESHOLDS.iter().find(|(f, _)| *f == format) else {
                return report;
            };
            let [high, medium, _low] = *bands;
            report.tier = if estimated_bitrate >= high as f64 {
                QualityTier::High
            } else if estimated_bitrate >= medium as f64 {
                QualityTier::Medium
            } else {
                QualityTier::Low
            };
            report.recommended_minimum = Some(RecommendedBitrate::Audio { kbps: medium });

            if report.tier == QualityTier::Low {
                report
                    .warnings
                    .push("Low quality audio file may result in poor transcription".to_string());
                report
                    .warnings
                    .push(format!("Recommended minimum bitrate: {medium} kbps"));
            }
        }
        MediaType::Video => {
            let Some((_, bands)) = VIDEO_THRESHOLDS.iter().find(|(f, _)| *f == format) else {
                return report;
            };
            let [(high_a, high_v), (med_a, med_v), _low] = *bands;
            report.tier = if estimated_bitrate >= (high_a + high_v) as f64 {
                QualityTier::High
            } else if estimated_bitrate >= (med_a + med_v) as f64 {
                QualityTier::Medium
            } else {
                QualityTier::Low
            };
            report.recommended_minimum = Some(RecommendedBitrate::AudioVideo {
                audio_kbps: med_a,
                video_kbps: med_v,
            });

            if report.tier == QualityTier::Low {
                report
                    .warnings
                    .push("Low quality video file may result in poor transcription".to_string());
                report.warnings.push(format!(
                    "Recommended minimum bitrate: Audio {med_a} kbps, Video {med_v} kbps"
                ));
            }
        }
    }

    report
}
