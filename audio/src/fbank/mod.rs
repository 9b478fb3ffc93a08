//! Log mel filterbank and MFCC extraction from PCM audio.
//!
//! Frames are pre-emphasized, Hamming-windowed, zero-padded to the FFT size
//! and projected onto a triangular mel filterbank. [`Mfcc`] adds a DCT-II on
//! top of the log energies.
//!
//! Default parameters follow the Kaldi convention:
//! - SampleRate: 16000
//! - WindowSize: 400 (25ms)
//! - HopSize: 160 (10ms)
//! - FFTSize: 512
//! - NumMels: 80
//! - LowFreq: 20 Hz
//! - HighFreq: 7600 Hz
//! - PreEmphasis: 0.97

mod fft;
mod mel;
mod mfcc;

pub use fft::Fft;
pub use mel::{MelFilterBank, hamming_window, hann_window};
pub use mfcc::{Mfcc, MfccConfig};

use serde::{Deserialize, Serialize};

use crate::AudioError;

/// Floor applied to mel energies before taking the log.
const ENERGY_FLOOR: f64 = 1e-10;

/// Configuration for mel filterbank extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sample_rate: usize,
    pub window_size: usize,
    pub hop_size: usize,
    pub fft_size: usize,
    pub num_mels: usize,
    pub low_freq: f64,
    pub high_freq: f64,
    pub pre_emphasis: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            window_size: 400,
            hop_size: 160,
            fft_size: 512,
            num_mels: 80,
            low_freq: 20.0,
            high_freq: 7600.0,
            pre_emphasis: 0.97,
        }
    }
}

impl Config {
    /// Checks that the frame geometry and band edges are usable.
    pub fn validate(&self) -> Result<(), AudioError> {
        let bad = |msg: String| Err(AudioError::InvalidConfig(msg));
        if self.sample_rate == 0 || self.window_size == 0 || self.hop_size == 0 {
            return bad("sample_rate, window_size and hop_size must be positive".into());
        }
        if !self.fft_size.is_power_of_two() || self.fft_size < self.window_size {
            return bad(format!(
                "fft_size {} must be a power of 2 no smaller than window_size {}",
                self.fft_size, self.window_size
            ));
        }
        if self.num_mels == 0 {
            return bad("num_mels must be positive".into());
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        if self.low_freq < 0.0 || self.high_freq <= self.low_freq || self.high_freq > nyquist {
            return bad(format!(
                "band {}..{} Hz must lie within 0..{nyquist} Hz",
                self.low_freq, self.high_freq
            ));
        }
        Ok(())
    }
}

/// Mel filterbank feature extractor.
#[derive(Debug, Clone)]
pub struct Extractor {
    cfg: Config,
    window: Vec<f64>,
    bank: MelFilterBank,
    fft: Fft,
}

impl Extractor {
    /// Creates a new extractor, validating the config first.
    pub fn new(cfg: Config) -> Result<Self, AudioError> {
        cfg.validate()?;
        let window = hamming_window(cfg.window_size);
        let bank = MelFilterBank::new(
            cfg.num_mels,
            cfg.fft_size,
            cfg.sample_rate,
            cfg.low_freq,
            cfg.high_freq,
        );
        let fft = Fft::new(cfg.fft_size);
        Ok(Self {
            cfg,
            window,
            bank,
            fft,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Number of full frames that fit in `n` samples.
    pub fn num_frames(&self, n: usize) -> usize {
        if n < self.cfg.window_size {
            return 0;
        }
        (n - self.cfg.window_size) / self.cfg.hop_size + 1
    }

    /// Extracts log mel energies from normalized f32 PCM samples (range [-1, 1]).
    ///
    /// Returns `[T][num_mels]` where `T = (len(pcm) - window_size) / hop_size + 1`.
    pub fn extract(&self, pcm: &[f32]) -> Vec<Vec<f32>> {
        let cfg = &self.cfg;
        let num_frames = self.num_frames(pcm.len());
        let nfft = cfg.fft_size;

        let mut features = Vec::with_capacity(num_frames);
        let mut real = vec![0.0f64; nfft];
        let mut imag = vec![0.0f64; nfft];
        let mut power = vec![0.0f64; self.bank.num_bins()];
        let mut energies = vec![0.0f64; cfg.num_mels];

        for t in 0..num_frames {
            let start = t * cfg.hop_size;

            // Pre-emphasis reaches back across the frame boundary.
            for i in 0..cfg.window_size {
                let mut s = pcm[start + i] as f64;
                if start + i > 0 {
                    s -= cfg.pre_emphasis * pcm[start + i - 1] as f64;
                }
                real[i] = s * self.window[i];
            }
            real[cfg.window_size..].fill(0.0);
            imag.fill(0.0);

            self.fft.forward(&mut real, &mut imag);

            for (k, p) in power.iter_mut().enumerate() {
                *p = real[k] * real[k] + imag[k] * imag[k];
            }

            self.bank.apply(&power, &mut energies);
            features.push(
                energies
                    .iter()
                    .map(|&e| e.max(ENERGY_FLOOR).ln() as f32)
                    .collect(),
            );
        }

        features
    }

    /// Mean-square sample energy of each frame, aligned with [`Extractor::extract`].
    pub fn frame_energies(&self, pcm: &[f32]) -> Vec<f64> {
        let cfg = &self.cfg;
        (0..self.num_frames(pcm.len()))
            .map(|t| {
                let frame = &pcm[t * cfg.hop_size..t * cfg.hop_size + cfg.window_size];
                frame.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>()
                    / cfg.window_size as f64
            })
            .collect()
    }
}
