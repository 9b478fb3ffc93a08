//! Batch sample rate conversion on top of rubato's FFT resampler.
//!
//! Unlike a streaming reader, [`resample`] sees the whole clip at once, so it
//! compensates the resampler latency and returns exactly
//! `round(len * to / from)` samples.
//!
//! # Example
//!
//! ```ignore
//! use voicegate_audio::resampler::resample;
//!
//! let clip_8k = vec![0.0f32; 8000];
//! let clip_16k = resample(&clip_8k, 8000, 16000)?;
//! assert_eq!(clip_16k.len(), 16000);
//! ```

use rubato::{FftFixedInOut, Resampler};
use tracing::debug;

use crate::AudioError;

/// Frames fed to rubato per processing block.
const CHUNK_SIZE: usize = 1024;

/// Number of output samples for `input_len` samples converted `from` -> `to` Hz.
pub fn output_len(input_len: usize, from: u32, to: u32) -> usize {
    if from == 0 {
        return 0;
    }
    let (from, to) = (from as u64, to as u64);
    ((input_len as u64 * to + from / 2) / from) as usize
}

/// Converts mono `samples` from `from` Hz to `to` Hz.
pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>, AudioError> {
    if from == 0 {
        return Err(AudioError::InvalidSampleRate(from));
    }
    if to == 0 {
        return Err(AudioError::InvalidSampleRate(to));
    }
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedInOut::<f32>::new(from as usize, to as usize, CHUNK_SIZE, 1)?;
    let delay = resampler.output_delay();
    let expected = output_len(samples.len(), from, to);
    debug!(from, to, in_len = samples.len(), expected, delay, "resampling");

    let mut input: Vec<Vec<f32>> = vec![Vec::new()];
    let mut output: Vec<Vec<f32>> = vec![vec![0.0; resampler.output_frames_max()]];
    let mut collected: Vec<f32> = Vec::with_capacity(expected + delay + CHUNK_SIZE);
    let mut pos = 0;

    // Keep feeding zeros past the end until the delayed tail is flushed out.
    while collected.len() < expected + delay {
        let need = resampler.input_frames_next();
        let take = need.min(samples.len() - pos);
        input[0].clear();
        input[0].extend_from_slice(&samples[pos..pos + take]);
        input[0].resize(need, 0.0);
        pos += take;

        let (_, written) = resampler.process_into_buffer(&input, &mut output, None)?;
        collected.extend_from_slice(&output[0][..written]);
    }

    let mut out: Vec<f32> = collected.into_iter().skip(delay).take(expected).collect();
    out.resize(expected, 0.0);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freq: f32, rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    fn zero_crossings(s: &[f32]) -> usize {
        s.windows(2).filter(|w| (w[0] < 0.0) != (w[1] < 0.0)).count()
    }

    #[test]
    fn test_output_len() {
        assert_eq!(output_len(8000, 8000, 16000), 16000);
        assert_eq!(output_len(44100, 44100, 16000), 16000);
        assert_eq!(output_len(3, 3, 2), 2);
        assert_eq!(output_len(10, 0, 16000), 0);
    }

    #[test]
    fn test_upsample_length_and_pitch() {
        let input = tone(440.0, 8000, 8000);
        let out = resample(&input, 8000, 16000).unwrap();
        assert_eq!(out.len(), 16000);

        // One second of 440 Hz crosses zero ~880 times regardless of rate.
        let zc = zero_crossings(&out[1000..15000]) as f32 * 16000.0 / 14000.0;
        assert!((zc - 880.0).abs() < 20.0, "zero crossings {zc}");
    }

    #[test]
    fn test_downsample_keeps_level() {
        let input = tone(1000.0, 48000, 48000 * 2);
        let out = resample(&input, 48000, 16000).unwrap();
        assert_eq!(out.len(), 32000);
        let mid = &out[4000..28000];
        let level = crate::signal::rms(mid);
        // 0.5 amplitude sine has RMS 0.354.
        assert!((level - 0.354).abs() < 0.02, "rms {level}");
    }

    #[test]
    fn test_same_rate_is_identity() {
        let input = tone(300.0, 16000, 1000);
        assert_eq!(resample(&input, 16000, 16000).unwrap(), input);
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            resample(&[0.1, 0.2], 0, 16000),
            Err(AudioError::InvalidSampleRate(0))
        ));
        assert!(matches!(
            resample(&[0.1, 0.2], 16000, 0),
            Err(AudioError::InvalidSampleRate(0))
        ));
    }
}
