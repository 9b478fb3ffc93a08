//! Mel-frequency cepstral coefficients.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{Config, Extractor};
use crate::AudioError;

/// Configuration for MFCC extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    /// Underlying log mel filterbank.
    pub fbank: Config,
    /// Number of cepstral coefficients kept, including c0 (default: 13).
    pub num_ceps: usize,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            fbank: Config {
                num_mels: 40,
                ..Config::default()
            },
            num_ceps: 13,
        }
    }
}

/// Computes MFCCs as an orthonormal DCT-II of log mel energies.
#[derive(Debug, Clone)]
pub struct Mfcc {
    extractor: Extractor,
    dct: Vec<Vec<f64>>,
}

impl Mfcc {
    pub fn new(cfg: MfccConfig) -> Result<Self, AudioError> {
        if cfg.num_ceps == 0 || cfg.num_ceps > cfg.fbank.num_mels {
            return Err(AudioError::InvalidConfig(format!(
                "num_ceps {} must be in 1..={}",
                cfg.num_ceps, cfg.fbank.num_mels
            )));
        }
        let dct = dct_matrix(cfg.num_ceps, cfg.fbank.num_mels);
        let extractor = Extractor::new(cfg.fbank)?;
        Ok(Self { extractor, dct })
    }

    /// The filterbank stage, for frame geometry and energies.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn num_ceps(&self) -> usize {
        self.dct.len()
    }

    /// Returns `[T][num_ceps]` cepstra for normalized f32 PCM.
    pub fn compute(&self, pcm: &[f32]) -> Vec<Vec<f32>> {
        self.extractor
            .extract(pcm)
            .iter()
            .map(|log_mel| {
                self.dct
                    .iter()
                    .map(|row| {
                        row.iter()
                            .zip(log_mel)
                            .map(|(&c, &e)| c * e as f64)
                            .sum::<f64>() as f32
                    })
                    .collect()
            })
            .collect()
    }
}

fn dct_matrix(num_ceps: usize, num_mels: usize) -> Vec<Vec<f64>> {
    let m = num_mels as f64;
    (0..num_ceps)
        .map(|k| {
            let scale = if k == 0 { (1.0 / m).sqrt() } else { (2.0 / m).sqrt() };
            (0..num_mels)
                .map(|n| scale * (PI * k as f64 * (n as f64 + 0.5) / m).cos())
                .collect()
        })
        .collect()
}
