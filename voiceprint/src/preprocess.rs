use serde::{Deserialize, Serialize};
use tracing::debug;

use voicegate_audio::resampler::resample;
use voicegate_audio::signal::{fit_length, non_silent_range, peak_normalize, rms};
use voicegate_audio::{DenoiseConfig, SpectralGate};

use crate::{Recording, VoiceprintError};

/// Frame geometry used when searching for leading/trailing silence.
const TRIM_FRAME: usize = 512;
const TRIM_HOP: usize = 128;

/// Configures the waveform preprocessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Canonical sample rate in Hz (default: 16000).
    pub sample_rate: u32,
    /// Canonical clip duration in milliseconds (default: 3000).
    pub duration_ms: u32,
    /// RMS level below which a recording counts as silent (default: 1e-4).
    pub silence_floor: f64,
    /// Leading/trailing audio this many dB below the loudest frame is
    /// trimmed; 0 disables trimming (default: 20).
    pub trim_top_db: f64,
    /// Spectral gate settings; `None` disables noise reduction.
    pub denoise: Option<DenoiseConfig>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            duration_ms: 3000,
            silence_floor: 1e-4,
            trim_top_db: 20.0,
            denoise: Some(DenoiseConfig::default()),
        }
    }
}

impl PreprocessConfig {
    /// Number of samples in a canonical clip.
    pub fn target_len(&self) -> usize {
        (self.sample_rate as u64 * self.duration_ms as u64 / 1000) as usize
    }
}

/// Normalizes and denoises raw recordings into fixed-length clips.
///
/// Stages: resample, silence check, peak normalization, spectral gating,
/// silence trimming, then zero-pad or truncate to the canonical length.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    cfg: PreprocessConfig,
    gate: Option<SpectralGate>,
}

impl Preprocessor {
    pub fn new(cfg: PreprocessConfig) -> Result<Self, VoiceprintError> {
        if cfg.sample_rate == 0 || cfg.target_len() == 0 {
            return Err(VoiceprintError::Config(
                "sample_rate and duration_ms must be positive".into(),
            ));
        }
        let gate = match &cfg.denoise {
            Some(d) => Some(SpectralGate::new(DenoiseConfig {
                sample_rate: cfg.sample_rate as usize,
                ..d.clone()
            })?),
            None => None,
        };
        Ok(Self { cfg, gate })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.cfg
    }

    /// Returns the cleaned clip at the canonical rate and length.
    pub fn process(&self, recording: &Recording) -> Result<Recording, VoiceprintError> {
        if recording.is_empty() {
            return Err(VoiceprintError::EmptyRecording { rms: 0.0 });
        }

        let mut samples = resample(
            recording.samples(),
            recording.sample_rate(),
            self.cfg.sample_rate,
        )?;

        let level = rms(&samples);
        // Written so that NaN levels are rejected too.
        if !(level >= self.cfg.silence_floor) {
            return Err(VoiceprintError::EmptyRecording { rms: level });
        }

        peak_normalize(&mut samples);

        if let Some(gate) = &self.gate {
            samples = gate.reduce(&samples);
        }

        if self.cfg.trim_top_db > 0.0 {
            let range = non_silent_range(&samples, self.cfg.trim_top_db, TRIM_FRAME, TRIM_HOP);
            if range.is_empty() {
                return Err(VoiceprintError::EmptyRecording { rms: rms(&samples) });
            }
            debug!(start = range.start, end = range.end, "trimmed silence");
            samples = samples[range].to_vec();
        }

        let target = self.cfg.target_len();
        if samples.len() > target {
            debug!(len = samples.len(), target, "truncating clip");
        }
        Ok(Recording::new(fit_length(samples, target), self.cfg.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freq: f32, rate: u32, n: usize, amp: f32) -> Vec<f32> {
        (0..n)
            .map(|i| amp * (2.0 * PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    /// Tone in the middle half of the clip, silence around it.
    fn burst(freq: f32, rate: u32, n: usize, amp: f32) -> Vec<f32> {
        let mut out = vec![0.0f32; n];
        let body = tone(freq, rate, n / 2, amp);
        out[n / 4..n / 4 + body.len()].copy_from_slice(&body);
        out
    }

    fn pre() -> Preprocessor {
        Preprocessor::new(PreprocessConfig::default()).unwrap()
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let err = pre().process(&Recording::new(Vec::new(), 16000)).unwrap_err();
        assert!(matches!(err, VoiceprintError::EmptyRecording { .. }));
    }

    #[test]
    fn silence_is_rejected() {
        let err = pre().process(&Recording::new(vec![0.0; 48000], 16000)).unwrap_err();
        assert!(matches!(err, VoiceprintError::EmptyRecording { .. }));

        let faint = tone(300.0, 16000, 48000, 1e-5);
        let err = pre().process(&Recording::new(faint, 16000)).unwrap_err();
        assert!(matches!(err, VoiceprintError::EmptyRecording { .. }));
    }

    #[test]
    fn nan_input_is_rejected() {
        let err = pre()
            .process(&Recording::new(vec![f32::NAN; 1000], 16000))
            .unwrap_err();
        assert!(matches!(err, VoiceprintError::EmptyRecording { .. }));
    }

    #[test]
    fn zero_sample_rate_is_an_error() {
        let err = pre()
            .process(&Recording::new(tone(300.0, 16000, 1000, 0.5), 0))
            .unwrap_err();
        assert!(matches!(err, VoiceprintError::Audio(_)));
    }

    #[test]
    fn output_is_canonical_for_any_rate_and_length() {
        for (rate, secs) in [(8000u32, 1.0f32), (16000, 3.0), (44100, 5.0), (48000, 2.5)] {
            let n = (rate as f32 * secs) as usize;
            let out = pre().process(&Recording::new(burst(440.0, rate, n, 0.3), rate)).unwrap();
            assert_eq!(out.sample_rate(), 16000);
            assert_eq!(out.len(), 48000, "rate {rate} secs {secs}");
        }
    }

    #[test]
    fn short_clip_is_zero_padded_at_tail() {
        let mut input = vec![0.0f32; 4000];
        input.extend(tone(440.0, 16000, 12000, 0.3));
        let out = pre().process(&Recording::new(input, 16000)).unwrap();
        assert!(out.samples()[20000..].iter().all(|&s| s == 0.0));
        assert!(rms(&out.samples()[..10000]) > 0.5);
    }

    #[test]
    fn leading_silence_is_trimmed() {
        let mut input = vec![0.0f32; 16000];
        input.extend(tone(440.0, 16000, 16000, 0.3));
        let out = pre().process(&Recording::new(input, 16000)).unwrap();

        // Peak normalization brings the tone to unit amplitude.
        assert!(rms(&out.samples()[..1000]) > 0.3);
        assert!(out.samples()[17000..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn denoise_and_trim_can_be_disabled() {
        let cfg = PreprocessConfig {
            denoise: None,
            trim_top_db: 0.0,
            ..PreprocessConfig::default()
        };
        let pre = Preprocessor::new(cfg).unwrap();
        let mut input = vec![0.0f32; 8000];
        input.extend(tone(440.0, 16000, 8000, 0.25));
        let out = pre.process(&Recording::new(input, 16000)).unwrap();

        assert!(out.samples()[..8000].iter().all(|&s| s == 0.0));
        assert!((voicegate_audio::signal::peak(out.samples()) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn invalid_config() {
        assert!(Preprocessor::new(PreprocessConfig {
            duration_ms: 0,
            ..PreprocessConfig::default()
        })
        .is_err());
    }
}
