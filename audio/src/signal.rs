//! Whole-buffer signal utilities: level, normalization, trimming, length fitting.

use std::ops::Range;

/// Root-mean-square level of `samples`. Zero for an empty buffer.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt()
}

/// Largest absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
}

/// Scales `samples` so the peak magnitude becomes 1.0. Silent buffers are left untouched.
pub fn peak_normalize(samples: &mut [f32]) {
    let p = peak(samples);
    if p > 0.0 {
        let scale = 1.0 / p;
        for s in samples.iter_mut() {
            *s *= scale;
        }
    }
}

/// Finds the non-silent span of `samples`.
///
/// The buffer is split into frames of `frame_len` samples every `hop`
/// samples. A frame is silent when its RMS is more than `top_db` decibels
/// below the loudest frame. Returns the sample range from the first to the
/// last non-silent frame; an empty range when everything is silent.
pub fn non_silent_range(samples: &[f32], top_db: f64, frame_len: usize, hop: usize) -> Range<usize> {
    let frame_len = frame_len.max(1);
    let hop = hop.max(1);
    if samples.is_empty() {
        return 0..0;
    }

    let frame_rms: Vec<f64> = (0..samples.len())
        .step_by(hop)
        .map(|start| rms(&samples[start..(start + frame_len).min(samples.len())]))
        .collect();
    let loudest = frame_rms.iter().copied().fold(0.0f64, f64::max);
    if loudest <= 0.0 {
        return 0..0;
    }

    let floor = loudest * 10f64.powf(-top_db / 20.0);
    let first = frame_rms.iter().position(|&r| r > floor);
    let last = frame_rms.iter().rposition(|&r| r > floor);
    match (first, last) {
        (Some(first), Some(last)) => {
            first * hop..(last * hop + frame_len).min(samples.len())
        }
        _ => 0..0,
    }
}

/// Zero-pads the tail or truncates so the buffer holds exactly `len` samples.
pub fn fit_length(mut samples: Vec<f32>, len: usize) -> Vec<f32> {
    samples.resize(len, 0.0);
    samples
}
