use serde::{Deserialize, Serialize};

use crate::features::{FeatureConfig, FeatureExtractor, FeatureVector};
use crate::preprocess::{PreprocessConfig, Preprocessor};
use crate::{Recording, VoiceprintError};

/// Turns raw recordings into comparable feature vectors.
///
/// Every vector returned by one model has length [`FeatureModel::dimension`],
/// and the same input always yields the same vector.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait FeatureModel: Send + Sync {
    /// Computes the feature vector of a raw recording.
    fn extract(&self, recording: &Recording) -> Result<FeatureVector, VoiceprintError>;

    /// Returns the dimensionality of the vectors (24 for the default MFCC model).
    fn dimension(&self) -> usize;
}

/// Configures the full preprocessing and feature pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceprintConfig {
    pub preprocess: PreprocessConfig,
    pub features: FeatureConfig,
}

/// Preprocessor followed by MFCC statistics pooling.
#[derive(Debug, Clone)]
pub struct MfccModel {
    pre: Preprocessor,
    features: FeatureExtractor,
}

impl MfccModel {
    pub fn new(cfg: VoiceprintConfig) -> Result<Self, VoiceprintError> {
        let rate = cfg.preprocess.sample_rate as usize;
        if cfg.features.mfcc.fbank.sample_rate != rate {
            return Err(VoiceprintError::Config(format!(
                "feature sample rate {} differs from preprocess rate {rate}",
                cfg.features.mfcc.fbank.sample_rate
            )));
        }
        let input_len = cfg.preprocess.target_len();
        let pre = Preprocessor::new(cfg.preprocess)?;
        let features = FeatureExtractor::new(cfg.features, input_len)?;
        Ok(Self { pre, features })
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.pre
    }
}

impl FeatureModel for MfccModel {
    fn extract(&self, recording: &Recording) -> Result<FeatureVector, VoiceprintError> {
        let clean = self.pre.process(recording)?;
        self.features.extract(&clean)
    }

    fn dimension(&self) -> usize {
        self.features.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn clip(rate: u32) -> Recording {
        let n = rate as usize * 2;
        let pcm = (0..n)
            .map(|i| {
                if i < n / 4 || i > 3 * n / 4 {
                    return 0.0;
                }
                let t = i as f32 / rate as f32;
                0.3 * (2.0 * PI * 180.0 * t).sin() + 0.1 * (2.0 * PI * 900.0 * t).sin()
            })
            .collect();
        Recording::new(pcm, rate)
    }

    #[test]
    fn extracts_from_any_rate() {
        let model = MfccModel::new(VoiceprintConfig::default()).unwrap();
        assert_eq!(model.dimension(), 24);
        for rate in [8000, 16000, 44100] {
            let v = model.extract(&clip(rate)).unwrap();
            assert_eq!(v.len(), 24);
            assert!(v.is_finite());
        }
    }

    #[test]
    fn usable_as_trait_object() {
        let model: Box<dyn FeatureModel> =
            Box::new(MfccModel::new(VoiceprintConfig::default()).unwrap());
        let a = model.extract(&clip(16000)).unwrap();
        let b = model.extract(&clip(16000)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_rates_rejected() {
        let mut cfg = VoiceprintConfig::default();
        cfg.features.mfcc.fbank.sample_rate = 8000;
        assert!(matches!(
            MfccModel::new(cfg),
            Err(VoiceprintError::Config(_))
        ));
    }

    #[test]
    fn silent_recording_propagates() {
        let model = MfccModel::new(VoiceprintConfig::default()).unwrap();
        let err = model.extract(&Recording::new(vec![0.0; 16000], 16000)).unwrap_err();
        assert!(matches!(err, VoiceprintError::EmptyRecording { .. }));
    }
}
