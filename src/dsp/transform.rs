//! Discrete Fourier transforms.
//!
//! The direct transform sums every term and is the reference: O(N²) per call,
//! exact up to floating point, any length. The fast transform hands the same
//! problem to rustfft and agrees with the direct one within numerical
//! tolerance; it is an opt-in substitution for large buffers.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A forward/inverse DFT implementation.
pub trait Transform {
    /// Transforms `signal` zero-padded or truncated to `len` samples and
    /// returns the first `bins` coefficients (`bins <= len`).
    fn forward(&self, signal: &[f64], len: usize, bins: usize) -> Vec<Complex<f64>>;

    /// Inverse transform, normalized by the length so that
    /// `inverse(forward(x, n, n)) == x`.
    fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<Complex<f64>>;
}

/// Direct summation, `X[k] = Σ x[n]·e^(-2πikn/N)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectDft;

/// FFT backed by rustfft.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastDft;

impl Transform for DirectDft {
    fn forward(&self, signal: &[f64], len: usize, bins: usize) -> Vec<Complex<f64>> {
        let bins = bins.min(len);
        let used = &signal[..signal.len().min(len)];
        let step = -2.0 * PI / len as f64;

        (0..bins)
            .map(|k| {
                let mut acc = Complex::new(0.0, 0.0);
                for (n, &x) in used.iter().enumerate() {
                    // Reduce k*n modulo N so the angle stays small and precise.
                    let angle = step * ((k * n) % len) as f64;
                    acc.re = x.mul_add(angle.cos(), acc.re);
                    acc.im = x.mul_add(angle.sin(), acc.im);
                }
                acc
            })
            .collect()
    }

    fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let len = spectrum.len();
        if len == 0 {
            return Vec::new();
        }
        let step = 2.0 * PI / len as f64;
        let scale = (len as f64).recip();

        (0..len)
            .map(|n| {
                let mut acc = Complex::new(0.0, 0.0);
                for (k, &c) in spectrum.iter().enumerate() {
                    let angle = step * ((k * n) % len) as f64;
                    acc += c * Complex::new(angle.cos(), angle.sin());
                }
                acc * scale
            })
            .collect()
    }
}

impl Transform for FastDft {
    fn forward(&self, signal: &[f64], len: usize, bins: usize) -> Vec<Complex<f64>> {
        if len == 0 {
            return Vec::new();
        }
        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .take(len)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(len, Complex::new(0.0, 0.0));

        let fft = FftPlanner::new().plan_fft_forward(len);
        fft.process(&mut buffer);

        buffer.truncate(bins.min(len));
        buffer
    }

    fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let len = spectrum.len();
        if len == 0 {
            return Vec::new();
        }
        let mut buffer = spectrum.to_vec();
        let fft = FftPlanner::new().plan_fft_inverse(len);
        fft.process(&mut buffer);

        let scale = (len as f64).recip();
        buffer.iter_mut().for_each(|c| *c *= scale);
        buffer
    }
}

/// Which transform implementation to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Direct O(N²) summation
    #[default]
    Direct,
    /// rustfft
    Fast,
}

impl TransformKind {
    /// Returns the implementation for this kind.
    pub fn transform(self) -> &'static dyn Transform {
        match self {
            Self::Direct => &DirectDft,
            Self::Fast => &FastDft,
        }
    }
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

/// Taper applied to each spectrogram frame before transforming.
///
/// Rectangular (no taper) is the default and leaks energy into neighbouring
/// bins; the display colour ranges are tuned against that output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    #[default]
    Rectangular,
    Hann,
    Hamming,
}

impl std::str::FromStr for WindowFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Ok(Self::Rectangular),
            "hann" => Ok(Self::Hann),
            "hamming" => Ok(Self::Hamming),
            other => Err(format!(
                "Unknown window '{other}': expected rectangular, hann or hamming"
            )),
        }
    }
}

impl WindowFunction {
    /// Weight of sample `i` in a frame of `len` samples (symmetric form).
    pub fn coefficient(self, i: usize, len: usize) -> f64 {
        if len < 2 {
            return 1.0;
        }
        let phase = 2.0 * PI * i as f64 / (len - 1) as f64;
        match self {
            Self::Rectangular => 1.0,
            Self::Hann => 0.5 - 0.5 * phase.cos(),
            Self::Hamming => 0.54 - 0.46 * phase.cos(),
        }
    }

    /// Multiplies `frame` by the window in place.
    pub fn apply(self, frame: &mut [f64]) {
        if self == Self::Rectangular {
            return;
        }
        let len = frame.len();
        for (i, x) in frame.iter_mut().enumerate() {
            *x *= self.coefficient(i, len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Superposition of known waves over 512 samples: 1.0 at bin 5, 2.0 at
    /// bin 31 and 5.0 at bin 53.
    fn test_signal() -> Vec<f64> {
        (0..512)
            .map(|i| {
                let t = i as f64 / 512.0;
                1.0 * (t * 5.0 * 2.0 * PI).sin()
                    + 2.0 * (t * 31.0 * 2.0 * PI).cos()
                    + 5.0 * (t * 53.0 * 2.0 * PI).sin()
            })
            .collect()
    }

    #[test]
    fn test_direct_finds_peaks() {
        let signal = test_signal();
        let spectrum = DirectDft.forward(&signal, signal.len(), signal.len() / 2);
        let half = signal.len() as f64 / 2.0;

        for (k, c) in spectrum.iter().enumerate() {
            let amplitude = c.norm() / half;
            match k {
                5 => assert_abs_diff_eq!(amplitude, 1.0, epsilon = 1e-9),
                31 => assert_abs_diff_eq!(amplitude, 2.0, epsilon = 1e-9),
                53 => assert_abs_diff_eq!(amplitude, 5.0, epsilon = 1e-9),
                _ => assert!(amplitude < 1e-9, "Unexpected peak of {} at {}", amplitude, k),
            }
        }
    }

    #[test]
    fn test_fast_equals_direct() {
        let signal = test_signal();
        let direct = DirectDft.forward(&signal, 600, 300);
        let fast = FastDft.forward(&signal, 600, 300);
        assert_eq!(direct.len(), fast.len());

        for (i, (d, f)) in direct.iter().zip(fast.iter()).enumerate() {
            assert!((d - f).norm() < 1e-7, "Difference at index {}: {} vs {}", i, d, f);
        }
    }

    #[test]
    fn test_inverse_restores_signal() {
        let signal = test_signal()[..64].to_vec();
        for kind in [TransformKind::Direct, TransformKind::Fast] {
            let t = kind.transform();
            let restored = t.inverse(&t.forward(&signal, 64, 64));
            for (x, y) in signal.iter().zip(restored.iter()) {
                assert_abs_diff_eq!(*x, y.re, epsilon = 1e-9);
                assert_abs_diff_eq!(0.0, y.im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_short_signal_is_zero_padded() {
        let padded = DirectDft.forward(&[1.0], 8, 4);
        // A single impulse has a flat spectrum.
        for c in padded {
            assert_abs_diff_eq!(c.re, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_transforms() {
        assert!(DirectDft.forward(&[], 0, 0).is_empty());
        assert!(FastDft.forward(&[], 0, 0).is_empty());
        assert!(FastDft.inverse(&[]).is_empty());
    }

    #[test]
    fn test_window_coefficients() {
        assert_eq!(WindowFunction::Rectangular.coefficient(3, 8), 1.0);
        assert_abs_diff_eq!(WindowFunction::Hann.coefficient(0, 9), 0.0);
        assert_abs_diff_eq!(WindowFunction::Hann.coefficient(4, 9), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(WindowFunction::Hamming.coefficient(0, 9), 0.08, epsilon = 1e-12);
        assert_eq!(WindowFunction::Hann.coefficient(0, 1), 1.0);
    }
}
