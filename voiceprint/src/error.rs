use thiserror::Error;

use voicegate_audio::AudioError;

/// Errors returned by preprocessing and feature extraction.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    /// The recording is empty or its level never rises above the silence floor.
    #[error("empty recording: level {rms:.2e} is below the silence floor")]
    EmptyRecording { rms: f64 },

    /// The cleaned buffer violates the analysis window contract.
    #[error("feature extraction failed: {0}")]
    FeatureExtraction(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Audio(#[from] AudioError),
}
