//! Audio signal processing for the voicegate pipeline.
//!
//! This crate provides the DSP building blocks used by feature extraction:
//!
//! - `fbank`: FFT, mel filterbank, log mel energies and MFCCs
//! - `resampler`: batch sample rate conversion (rubato)
//! - `denoise`: stationary spectral gating noise reduction
//! - `signal`: level measurement, peak normalization, silence trimming
//!
//! # Example
//!
//! ```rust
//! use voicegate_audio::fbank::{Mfcc, MfccConfig};
//!
//! let mfcc = Mfcc::new(MfccConfig::default()).unwrap();
//!
//! // 100ms of a 440Hz tone at 16kHz
//! let pcm: Vec<f32> = (0..1600)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
//!     .collect();
//!
//! let cepstra = mfcc.compute(&pcm);
//! assert_eq!(cepstra[0].len(), 13);
//! ```

pub mod denoise;
mod error;
pub mod fbank;
pub mod resampler;
pub mod signal;

pub use denoise::{DenoiseConfig, SpectralGate};
pub use error::AudioError;
