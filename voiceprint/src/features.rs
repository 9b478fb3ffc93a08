use serde::{Deserialize, Serialize};
use tracing::debug;

use voicegate_audio::fbank::{Mfcc, MfccConfig};

use crate::{Recording, VoiceprintError};

/// A fixed-length summary of a clip's spectral content.
///
/// Produced deterministically by [`FeatureExtractor::extract`]; immutable
/// once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every element is a finite number.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Configures MFCC statistics pooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub mfcc: MfccConfig,
    /// Keep c0 (frame log energy) in the pooled statistics (default: false).
    pub include_energy: bool,
    /// Frames with mean-square energy at or below this are skipped (default: 1e-8).
    pub voiced_floor: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            mfcc: MfccConfig::default(),
            include_energy: false,
            voiced_floor: 1e-8,
        }
    }
}

/// Pools per-frame MFCCs into one normalized vector.
///
/// The vector is `[mean c_i..., std c_i...]` over voiced frames, then shifted
/// and scaled to zero mean and unit variance across its elements.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    cfg: FeatureConfig,
    mfcc: Mfcc,
    input_len: usize,
}

impl FeatureExtractor {
    /// Creates an extractor for cleaned clips of exactly `input_len` samples.
    pub fn new(cfg: FeatureConfig, input_len: usize) -> Result<Self, VoiceprintError> {
        let mfcc = Mfcc::new(cfg.mfcc.clone())?;
        let first = if cfg.include_energy { 0 } else { 1 };
        if mfcc.num_ceps() <= first {
            return Err(VoiceprintError::Config(
                "num_ceps leaves no coefficients to pool".into(),
            ));
        }
        if mfcc.extractor().num_frames(input_len) == 0 {
            return Err(VoiceprintError::Config(format!(
                "clip of {input_len} samples is shorter than one analysis frame"
            )));
        }
        Ok(Self {
            cfg,
            mfcc,
            input_len,
        })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.cfg
    }

    /// Length of every vector this extractor produces.
    pub fn dimension(&self) -> usize {
        2 * (self.mfcc.num_ceps() - self.first_coeff())
    }

    fn first_coeff(&self) -> usize {
        if self.cfg.include_energy { 0 } else { 1 }
    }

    /// Extracts the feature vector of a cleaned clip.
    pub fn extract(&self, clean: &Recording) -> Result<FeatureVector, VoiceprintError> {
        let expected_rate = self.cfg.mfcc.fbank.sample_rate;
        if clean.sample_rate() as usize != expected_rate {
            return Err(VoiceprintError::FeatureExtraction(format!(
                "expected {expected_rate} Hz input, got {} Hz",
                clean.sample_rate()
            )));
        }
        if clean.len() != self.input_len {
            return Err(VoiceprintError::FeatureExtraction(format!(
                "expected {} samples, got {}",
                self.input_len,
                clean.len()
            )));
        }

        let pcm = clean.samples();
        let cepstra = self.mfcc.compute(pcm);
        let energies = self.mfcc.extractor().frame_energies(pcm);
        let voiced: Vec<&Vec<f32>> = cepstra
            .iter()
            .zip(&energies)
            .filter(|&(_, &e)| e > self.cfg.voiced_floor)
            .map(|(c, _)| c)
            .collect();
        if voiced.is_empty() {
            return Err(VoiceprintError::FeatureExtraction("no voiced frames".into()));
        }
        debug!(frames = cepstra.len(), voiced = voiced.len(), "pooling cepstra");

        let n = voiced.len() as f64;
        let coeffs = self.first_coeff()..self.mfcc.num_ceps();
        let mut means = Vec::with_capacity(coeffs.len());
        let mut stds = Vec::with_capacity(coeffs.len());
        for k in coeffs {
            let mean = voiced.iter().map(|c| c[k] as f64).sum::<f64>() / n;
            let var = voiced.iter().map(|c| (c[k] as f64 - mean).powi(2)).sum::<f64>() / n;
            means.push(mean);
            stds.push(var.sqrt());
        }
        means.extend(stds);

        standardize(&means).map(FeatureVector::new)
    }
}

/// Zero mean, unit variance across the elements of `v`.
fn standardize(v: &[f64]) -> Result<Vec<f32>, VoiceprintError> {
    let n = v.len() as f64;
    let mean = v.iter().sum::<f64>() / n;
    let std = (v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
    if !std.is_finite() || std < 1e-12 {
        return Err(VoiceprintError::FeatureExtraction(format!(
            "degenerate feature statistics (std {std})"
        )));
    }
    Ok(v.iter().map(|x| ((x - mean) / std) as f32).collect())
}
