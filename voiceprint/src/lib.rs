//! Waveform preprocessing and voice feature extraction.
//!
//! # Architecture
//!
//! A raw clip flows through two stages:
//!
//! 1. [`Preprocessor::process`]: any rate/length -> cleaned 16 kHz, 3 s clip
//!    (resample, peak normalize, spectral gate, trim silence, pad/truncate)
//! 2. [`FeatureExtractor::extract`]: cleaned clip -> [`FeatureVector`]
//!    (13 MFCCs per frame, mean and std of c1..c12 over voiced frames,
//!    standardized to zero mean and unit variance)
//!
//! [`MfccModel`] chains both behind the [`FeatureModel`] trait, which is what
//! the decision engine consumes.
//!
//! ```text
//! Recording ──> Preprocessor ──> FeatureExtractor ──> FeatureVector (24-d)
//! ```

mod error;
pub mod features;
mod model;
pub mod preprocess;
mod recording;

pub use error::VoiceprintError;
pub use features::{FeatureConfig, FeatureExtractor, FeatureVector};
pub use model::{FeatureModel, MfccModel, VoiceprintConfig};
pub use preprocess::{PreprocessConfig, Preprocessor};
pub use recording::Recording;
