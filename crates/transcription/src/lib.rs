pub mod client;
pub mod error;
pub mod format;
pub mod media_quality;
pub mod model;
pub mod nlp;
pub mod quality;

pub use client::{CallbackEvent, JobDetails, SubmitOptions, TranscriptionClient};
pub use error::TranscriptionError;
pub use media_quality::{MediaQualityEstimator, MediaQualityReport, QualityTier};
pub use model::{
    JobMetadata, JobStatus, Monologue, Transcript, TranscriptElement, TranscriptionJob,
};
pub use nlp::{EnhancedTranscript, LinguisticAnalysis};
pub use quality::{QualityRating, QualityReport};
