//! Radix-2 Cooley-Tukey FFT with precomputed twiddles.

use std::f64::consts::PI;

/// Fixed-size complex transform over split real/imaginary buffers.
///
/// The bit-reversal table and twiddle factors are built once so one
/// instance serves every frame of a clip.
#[derive(Debug, Clone)]
pub struct Fft {
    n: usize,
    rev: Vec<usize>,
    cos: Vec<f64>,
    sin: Vec<f64>,
}

impl Fft {
    /// Creates a transform of size `n`. Panics if `n` is not a power of 2.
    pub fn new(n: usize) -> Self {
        assert!(n.is_power_of_two(), "fft: size must be a power of 2, got {n}");
        let bits = n.trailing_zeros();
        let rev = (0..n)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();
        let half = n / 2;
        let step = -2.0 * PI / n as f64;
        let cos = (0..half).map(|k| (step * k as f64).cos()).collect();
        let sin = (0..half).map(|k| (step * k as f64).sin()).collect();
        Self { n, rev, cos, sin }
    }

    /// Transform size.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Forward transform in place.
    pub fn forward(&self, real: &mut [f64], imag: &mut [f64]) {
        self.transform(real, imag, false);
    }

    /// Inverse transform in place, scaled by `1/n`.
    pub fn inverse(&self, real: &mut [f64], imag: &mut [f64]) {
        self.transform(real, imag, true);
        let scale = 1.0 / self.n as f64;
        for v in real.iter_mut() {
            *v *= scale;
        }
        for v in imag.iter_mut() {
            *v *= scale;
        }
    }

    fn transform(&self, real: &mut [f64], imag: &mut [f64], inverse: bool) {
        let n = self.n;
        debug_assert_eq!(real.len(), n);
        debug_assert_eq!(imag.len(), n);

        for i in 0..n {
            let j = self.rev[i];
            if i < j {
                real.swap(i, j);
                imag.swap(i, j);
            }
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;
            for start in (0..n).step_by(size) {
                for k in 0..half {
                    let w_r = self.cos[k * stride];
                    let w_i = if inverse {
                        -self.sin[k * stride]
                    } else {
                        self.sin[k * stride]
                    };
                    let u = start + k;
                    let v = u + half;

                    let t_r = w_r * real[v] - w_i * imag[v];
                    let t_i = w_r * imag[v] + w_i * real[v];

                    real[v] = real[u] - t_r;
                    imag[v] = imag[u] - t_i;
                    real[u] += t_r;
                    imag[u] += t_i;
                }
            }
            size <<= 1;
        }
    }
}
