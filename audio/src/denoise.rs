//! Stationary spectral gating noise reduction.
//!
//! The clip is analysed with a Hann-windowed STFT. A per-frequency noise
//! profile (mean and standard deviation of bin power in dB) is estimated from
//! the quietest frames of the same clip. Bins that do not rise `n_std`
//! deviations above the profile are attenuated; the binary mask is
//! box-smoothed over time and frequency before being applied, and the signal
//! is resynthesized by weighted overlap-add.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AudioError;
use crate::fbank::{Fft, hann_window};

/// Floor added to bin power before converting to dB.
const POWER_FLOOR: f64 = 1e-10;

/// Configuration for [`SpectralGate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Sample rate used to convert smoothing widths (default: 16000).
    pub sample_rate: usize,
    /// STFT size, power of 2 (default: 512).
    pub fft_size: usize,
    /// STFT hop; at most `fft_size / 2` (default: 128).
    pub hop_size: usize,
    /// Standard deviations above the noise mean a bin must reach to pass (default: 1.5).
    pub n_std: f64,
    /// Fraction of the quietest frames used as the noise estimate (default: 0.1).
    pub noise_fraction: f64,
    /// How much gated bins are attenuated, 0 = none, 1 = fully (default: 1.0).
    pub prop_decrease: f64,
    /// Mask smoothing width along frequency, in Hz (default: 100).
    pub freq_smooth_hz: f64,
    /// Mask smoothing width along time, in milliseconds (default: 50).
    pub time_smooth_ms: f64,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            fft_size: 512,
            hop_size: 128,
            n_std: 1.5,
            noise_fraction: 0.1,
            prop_decrease: 1.0,
            freq_smooth_hz: 100.0,
            time_smooth_ms: 50.0,
        }
    }
}

/// Per-bin noise statistics in dB.
struct NoiseProfile {
    mean_db: Vec<f64>,
    std_db: Vec<f64>,
}

impl NoiseProfile {
    fn from_frames(frames: &[&Vec<f64>]) -> Self {
        let bins = frames.first().map_or(0, |f| f.len());
        let n = frames.len().max(1) as f64;
        let mut mean_db = vec![0.0; bins];
        let mut std_db = vec![0.0; bins];
        for k in 0..bins {
            let mean = frames.iter().map(|f| f[k]).sum::<f64>() / n;
            let var = frames.iter().map(|f| (f[k] - mean).powi(2)).sum::<f64>() / n;
            mean_db[k] = mean;
            std_db[k] = var.sqrt();
        }
        Self { mean_db, std_db }
    }

    fn threshold(&self, n_std: f64) -> Vec<f64> {
        self.mean_db
            .iter()
            .zip(&self.std_db)
            .map(|(m, s)| m + n_std * s)
            .collect()
    }
}

struct Stft {
    real: Vec<Vec<f64>>,
    imag: Vec<Vec<f64>>,
}

impl Stft {
    fn power_db(&self) -> Vec<Vec<f64>> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(re, im)| {
                re.iter()
                    .zip(im)
                    .map(|(r, i)| 10.0 * (r * r + i * i + POWER_FLOOR).log10())
                    .collect()
            })
            .collect()
    }
}

/// Spectral gating denoiser.
#[derive(Debug, Clone)]
pub struct SpectralGate {
    cfg: DenoiseConfig,
    fft: Fft,
    window: Vec<f64>,
}

impl SpectralGate {
    pub fn new(cfg: DenoiseConfig) -> Result<Self, AudioError> {
        if !cfg.fft_size.is_power_of_two() || cfg.fft_size < 4 {
            return Err(AudioError::InvalidConfig(format!(
                "denoise fft_size {} must be a power of 2 >= 4",
                cfg.fft_size
            )));
        }
        if cfg.hop_size == 0 || cfg.hop_size > cfg.fft_size / 2 {
            return Err(AudioError::InvalidConfig(format!(
                "denoise hop_size {} must be in 1..={}",
                cfg.hop_size,
                cfg.fft_size / 2
            )));
        }
        if !(0.0..=1.0).contains(&cfg.noise_fraction) || !(0.0..=1.0).contains(&cfg.prop_decrease) {
            return Err(AudioError::InvalidConfig(
                "noise_fraction and prop_decrease must be within 0..=1".into(),
            ));
        }
        let fft = Fft::new(cfg.fft_size);
        let window = hann_window(cfg.fft_size);
        Ok(Self { cfg, fft, window })
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.cfg
    }

    /// Denoises `samples` with a profile taken from their own quietest frames.
    pub fn reduce(&self, samples: &[f32]) -> Vec<f32> {
        if samples.is_empty() {
            return Vec::new();
        }
        let stft = self.stft(samples);
        let db = stft.power_db();

        let mut order: Vec<usize> = (0..db.len()).collect();
        let frame_level = |t: usize| db[t].iter().sum::<f64>();
        order.sort_by(|&a, &b| frame_level(a).total_cmp(&frame_level(b)));
        let take = ((db.len() as f64 * self.cfg.noise_fraction).ceil() as usize).clamp(1, db.len());
        let quiet: Vec<&Vec<f64>> = order[..take].iter().map(|&t| &db[t]).collect();
        let profile = NoiseProfile::from_frames(&quiet);
        debug!(frames = db.len(), noise_frames = take, "estimated noise profile");

        self.gate(samples.len(), stft, &db, &profile)
    }

    fn gate(&self, len: usize, mut stft: Stft, db: &[Vec<f64>], profile: &NoiseProfile) -> Vec<f32> {
        let threshold = profile.threshold(self.cfg.n_std);
        let floor = 1.0 - self.cfg.prop_decrease;
        let mask: Vec<Vec<f64>> = db
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .zip(&threshold)
                    .map(|(&p, &t)| if p > t { 1.0 } else { floor })
                    .collect()
            })
            .collect();

        let bin_hz = self.cfg.sample_rate as f64 / self.cfg.fft_size as f64;
        let hop_ms = self.cfg.hop_size as f64 * 1000.0 / self.cfg.sample_rate as f64;
        let freq_radius = (self.cfg.freq_smooth_hz / bin_hz / 2.0).round() as usize;
        let time_radius = (self.cfg.time_smooth_ms / hop_ms / 2.0).round() as usize;
        let mask = smooth(&mask, time_radius, freq_radius);

        for ((re, im), m) in stft.real.iter_mut().zip(stft.imag.iter_mut()).zip(&mask) {
            for k in 0..m.len() {
                re[k] *= m[k];
                im[k] *= m[k];
            }
        }
        self.istft(&stft, len)
    }

    /// Centered STFT: the signal is zero-padded by half a window on both sides.
    fn stft(&self, samples: &[f32]) -> Stft {
        let n = self.cfg.fft_size;
        let hop = self.cfg.hop_size;
        let pad = n / 2;
        let bins = n / 2 + 1;
        let num_frames = samples.len() / hop + 1;

        let mut padded = vec![0.0f64; samples.len() + 2 * pad];
        for (dst, &s) in padded[pad..].iter_mut().zip(samples) {
            *dst = s as f64;
        }

        let mut real = Vec::with_capacity(num_frames);
        let mut imag = Vec::with_capacity(num_frames);
        let mut re = vec![0.0; n];
        let mut im = vec![0.0; n];
        for t in 0..num_frames {
            let start = t * hop;
            for i in 0..n {
                re[i] = padded[start + i] * self.window[i];
            }
            im.fill(0.0);
            self.fft.forward(&mut re, &mut im);
            real.push(re[..bins].to_vec());
            imag.push(im[..bins].to_vec());
        }
        Stft { real, imag }
    }

    fn istft(&self, stft: &Stft, len: usize) -> Vec<f32> {
        let n = self.cfg.fft_size;
        let hop = self.cfg.hop_size;
        let pad = n / 2;
        let total = len + 2 * pad;

        let mut out = vec![0.0f64; total];
        let mut norm = vec![0.0f64; total];
        let mut re = vec![0.0; n];
        let mut im = vec![0.0; n];

        for (t, (fr, fi)) in stft.real.iter().zip(&stft.imag).enumerate() {
            // Rebuild the full spectrum from its Hermitian half.
            re[..fr.len()].copy_from_slice(fr);
            im[..fi.len()].copy_from_slice(fi);
            for k in fr.len()..n {
                re[k] = fr[n - k];
                im[k] = -fi[n - k];
            }
            self.fft.inverse(&mut re, &mut im);

            let start = t * hop;
            for i in 0..n {
                if start + i >= total {
                    break;
                }
                out[start + i] += re[i] * self.window[i];
                norm[start + i] += self.window[i] * self.window[i];
            }
        }

        (pad..pad + len)
            .map(|i| {
                if norm[i] > 1e-8 {
                    (out[i] / norm[i]) as f32
                } else {
                    0.0
                }
            })
            .collect()
    }
}

/// Separable box filter over a `[time][freq]` mask.
fn smooth(mask: &[Vec<f64>], time_radius: usize, freq_radius: usize) -> Vec<Vec<f64>> {
    let frames = mask.len();
    if frames == 0 {
        return Vec::new();
    }
    let bins = mask[0].len();

    let along_freq: Vec<Vec<f64>> = mask
        .iter()
        .map(|row| {
            (0..bins)
                .map(|k| {
                    let lo = k.saturating_sub(freq_radius);
                    let hi = (k + freq_radius).min(bins - 1);
                    row[lo..=hi].iter().sum::<f64>() / (hi - lo + 1) as f64
                })
                .collect()
        })
        .collect();

    (0..frames)
        .map(|t| {
            let lo = t.saturating_sub(time_radius);
            let hi = (t + time_radius).min(frames - 1);
            let count = (hi - lo + 1) as f64;
            (0..bins)
                .map(|k| along_freq[lo..=hi].iter().map(|r| r[k]).sum::<f64>() / count)
                .collect()
        })
        .collect()
}
