//! Window functions and the triangular mel filterbank.

use std::f64::consts::PI;

/// Symmetric Hamming window of the given length.
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// Periodic Hann window, used for STFT analysis/resynthesis.
pub fn hann_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// One triangular filter, stored from its first non-zero bin.
#[derive(Debug, Clone)]
struct Filter {
    start: usize,
    weights: Vec<f64>,
}

/// Triangular filters equally spaced on the mel scale.
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    filters: Vec<Filter>,
    half_fft: usize,
}

impl MelFilterBank {
    /// Builds `num_mels` filters over `fft_size / 2 + 1` power bins.
    pub fn new(
        num_mels: usize,
        fft_size: usize,
        sample_rate: usize,
        low_freq: f64,
        high_freq: f64,
    ) -> Self {
        let half_fft = fft_size / 2 + 1;
        let low_mel = hz_to_mel(low_freq);
        let high_mel = hz_to_mel(high_freq);
        let step = (high_mel - low_mel) / (num_mels + 1) as f64;

        let mut bins: Vec<usize> = (0..num_mels + 2)
            .map(|i| {
                let hz = mel_to_hz(low_mel + i as f64 * step);
                let bin = (hz * fft_size as f64 / sample_rate as f64).round() as usize;
                bin.min(half_fft - 1)
            })
            .collect();

        // Every filter needs a non-empty rising and falling edge.
        for i in 1..bins.len() {
            if bins[i] <= bins[i - 1] {
                bins[i] = bins[i - 1] + 1;
            }
        }

        let filters = (0..num_mels)
            .map(|m| {
                let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);
                let end = right.min(half_fft - 1);
                let weights = (left..=end)
                    .map(|k| {
                        if k < center {
                            (k - left) as f64 / (center - left) as f64
                        } else {
                            (right - k) as f64 / (right - center) as f64
                        }
                    })
                    .collect();
                Filter {
                    start: left,
                    weights,
                }
            })
            .collect();

        Self { filters, half_fft }
    }

    /// Number of filters.
    pub fn num_mels(&self) -> usize {
        self.filters.len()
    }

    /// Number of power bins each filter spans.
    pub fn num_bins(&self) -> usize {
        self.half_fft
    }

    /// Writes the weighted energy of `power` under each filter into `out`.
    pub fn apply(&self, power: &[f64], out: &mut [f64]) {
        for (filter, slot) in self.filters.iter().zip(out.iter_mut()) {
            *slot = filter
                .weights
                .iter()
                .enumerate()
                .filter_map(|(i, &w)| power.get(filter.start + i).map(|&p| w * p))
                .sum();
        }
    }
}
