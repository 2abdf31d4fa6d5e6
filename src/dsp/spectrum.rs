//! Single-shot magnitude spectrum of a whole buffer.

use serde::{Deserialize, Serialize};

use super::transform::{Transform, TransformKind};
use super::to_db;
use crate::error::{AudiogramError, Result};

/// Options for [`magnitude_spectrum`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Transform length. `None` uses the next power of two at or above the
    /// buffer length; longer buffers are truncated, shorter ones zero-padded.
    pub analysis_size: Option<usize>,
    /// Transform implementation.
    pub transform: TransformKind,
}

/// Per-bin frequencies (Hz) and magnitudes (dB) of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Wraps externally computed data. Both arrays must have the same length.
    pub fn new(frequencies: Vec<f64>, magnitudes: Vec<f64>) -> Result<Self> {
        if frequencies.len() != magnitudes.len() {
            return Err(AudiogramError::SpectrumShape {
                frequencies: frequencies.len(),
                magnitudes: magnitudes.len(),
            });
        }
        Ok(Self {
            frequencies,
            magnitudes,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Smallest and largest finite magnitude, if any.
    pub fn magnitude_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.magnitudes)
    }

    /// Magnitude at `hz`, interpolated linearly between the neighbouring
    /// bins. `None` outside the covered frequency range.
    pub fn level_at(&self, hz: f64) -> Option<f64> {
        if !hz.is_finite() {
            return None;
        }
        let (f, m) = (&self.frequencies, &self.magnitudes);
        let i = f.partition_point(|&x| x < hz);
        if i == f.len() {
            return None;
        }
        if f[i] == hz {
            return Some(m[i]);
        }
        if i == 0 {
            return None;
        }
        let t = (hz - f[i - 1]) / (f[i] - f[i - 1]);
        Some(m[i - 1] + t * (m[i] - m[i - 1]))
    }

    /// Frequency and magnitude of the loudest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .filter(|(_, m)| m.is_finite())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&f, &m)| (f, m))
    }
}

/// Computes the single-sided magnitude spectrum of `samples` in dB.
///
/// Bin `k` of `N/2` lies at `k * sample_rate / N` and holds
/// `20 * log10(|X[k]| / (N/2) + 1e-12)`. An empty buffer yields an empty
/// spectrum.
///
/// # Errors
/// - If `sample_rate` is zero
/// - If an explicit analysis size of zero is requested
pub fn magnitude_spectrum(
    samples: &[f32],
    sample_rate: u32,
    options: &AnalysisOptions,
) -> Result<Spectrum> {
    if sample_rate == 0 {
        return Err(AudiogramError::InvalidSampleRate { rate: sample_rate });
    }
    let len = match options.analysis_size {
        Some(0) => return Err(AudiogramError::InvalidAnalysisSize { size: 0 }),
        Some(size) => size,
        None if samples.is_empty() => 0,
        None => samples.len().next_power_of_two(),
    };

    let signal = to_signal(samples);
    let magnitudes = half_spectrum_db(&signal, len, options.transform.transform());
    let bin_width = sample_rate as f64 / len.max(1) as f64;
    let frequencies = (0..magnitudes.len()).map(|k| k as f64 * bin_width).collect();

    tracing::trace!(
        samples = samples.len(),
        len,
        transform = %options.transform,
        "magnitude spectrum computed"
    );

    Ok(Spectrum {
        frequencies,
        magnitudes,
    })
}

/// dB magnitudes of the first `len / 2` bins of `signal` transformed at `len`.
pub(crate) fn half_spectrum_db(signal: &[f64], len: usize, transform: &dyn Transform) -> Vec<f64> {
    let half = len / 2;
    if half == 0 {
        return Vec::new();
    }
    transform
        .forward(signal, len, half)
        .iter()
        .map(|c| to_db(c.norm(), half as f64))
        .collect()
}

/// Widens samples to f64, replacing NaN and infinities with silence.
pub(crate) fn to_signal(samples: &[f32]) -> Vec<f64> {
    samples
        .iter()
        .map(|&s| if s.is_finite() { s as f64 } else { 0.0 })
        .collect()
}

pub(crate) fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::FLOOR_DB;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_sine_peak_at_nearest_bin() {
        let rate = 8000;
        let samples = sine(1000.0, 0.8, rate, 1024);
        let spectrum = magnitude_spectrum(&samples, rate, &AnalysisOptions::default()).unwrap();
        assert_eq!(spectrum.len(), 512);

        let (peak_hz, peak_db) = spectrum.peak().unwrap();
        assert_abs_diff_eq!(peak_hz, 1000.0, epsilon = rate as f64 / 1024.0);
        // Amplitude 0.8 is about -1.9 dB after the N/2 normalization.
        assert_abs_diff_eq!(peak_db, 20.0 * 0.8f64.log10(), epsilon = 0.01);

        let runner_up = spectrum
            .frequencies()
            .iter()
            .zip(spectrum.magnitudes())
            .filter(|(&f, _)| (f - peak_hz).abs() > 1.0)
            .map(|(_, &m)| m)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(peak_db - runner_up > 40.0, "peak {} vs {}", peak_db, runner_up);
    }

    #[test]
    fn test_frequencies_follow_bin_width() {
        let spectrum = magnitude_spectrum(&[0.0; 100], 44100, &AnalysisOptions::default()).unwrap();
        // 100 samples pad to 128
        assert_eq!(spectrum.len(), 64);
        assert_eq!(spectrum.frequencies()[0], 0.0);
        assert_abs_diff_eq!(spectrum.frequencies()[1], 44100.0 / 128.0);
        assert!(spectrum.frequencies().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_silence_sits_on_floor() {
        let spectrum = magnitude_spectrum(&[0.0; 16], 1000, &AnalysisOptions::default()).unwrap();
        for &m in spectrum.magnitudes() {
            assert_abs_diff_eq!(m, FLOOR_DB, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_explicit_size_truncates() {
        let samples = vec![0.25; 4096];
        let options = AnalysisOptions {
            analysis_size: Some(256),
            ..Default::default()
        };
        let spectrum = magnitude_spectrum(&samples, 22050, &options).unwrap();
        assert_eq!(spectrum.len(), 128);
        // DC of a constant 0.25 over 256 samples, normalized by 128, is 0.5.
        assert_abs_diff_eq!(spectrum.magnitudes()[0], 20.0 * 0.5f64.log10(), epsilon = 1e-9);
    }

    #[test]
    fn test_empty_input_is_empty_spectrum() {
        let spectrum = magnitude_spectrum(&[], 44100, &AnalysisOptions::default()).unwrap();
        assert!(spectrum.is_empty());
        assert!(spectrum.peak().is_none());
        assert!(magnitude_spectrum(&[0.5], 44100, &AnalysisOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        assert_eq!(
            magnitude_spectrum(&[0.0; 8], 0, &AnalysisOptions::default()),
            Err(AudiogramError::InvalidSampleRate { rate: 0 })
        );
        let options = AnalysisOptions {
            analysis_size: Some(0),
            ..Default::default()
        };
        assert!(magnitude_spectrum(&[0.0; 8], 8000, &options).is_err());
    }

    #[test]
    fn test_non_finite_samples_are_silenced() {
        let spectrum = magnitude_spectrum(&[f32::NAN, f32::INFINITY, 0.0, 0.0], 8, &AnalysisOptions::default()).unwrap();
        assert!(spectrum.magnitudes().iter().all(|m| m.is_finite()));
    }

    #[test]
    fn test_external_spectrum_shape_checked() {
        assert!(Spectrum::new(vec![0.0, 1.0], vec![-3.0, -6.0]).is_ok());
        assert_eq!(
            Spectrum::new(vec![0.0], vec![]),
            Err(AudiogramError::SpectrumShape {
                frequencies: 1,
                magnitudes: 0
            })
        );
    }

    #[test]
    fn test_level_at_interpolates_between_bins() {
        let spectrum = Spectrum::new(vec![0.0, 100.0, 200.0], vec![-10.0, -20.0, -40.0]).unwrap();
        assert_eq!(spectrum.level_at(0.0), Some(-10.0));
        assert_eq!(spectrum.level_at(100.0), Some(-20.0));
        assert_abs_diff_eq!(spectrum.level_at(150.0).unwrap(), -30.0);
        assert_eq!(spectrum.level_at(250.0), None);
        assert_eq!(spectrum.level_at(-5.0), None);
        assert_eq!(spectrum.level_at(f64::NAN), None);
        assert_eq!(Spectrum::default().level_at(0.0), None);
    }

    #[test]
    fn test_audiogram_levels_of_tone() {
        let rate = 22050;
        let spectrum = magnitude_spectrum(&sine(1000.0, 0.5, rate, 4096), rate, &AnalysisOptions::default()).unwrap();
        let levels: Vec<(f64, f64)> = crate::dsp::audiogram_frequencies(rate)
            .into_iter()
            .filter_map(|hz| spectrum.level_at(hz).map(|db| (hz, db)))
            .collect();
        assert_eq!(levels.len(), 11);

        let (loudest, _) = levels
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(loudest, 1000.0);
    }

    #[test]
    fn test_fast_transform_matches_direct() {
        let samples = sine(440.0, 0.5, 8000, 1000);
        let direct = magnitude_spectrum(&samples, 8000, &AnalysisOptions::default()).unwrap();
        let fast = magnitude_spectrum(
            &samples,
            8000,
            &AnalysisOptions {
                transform: TransformKind::Fast,
                ..Default::default()
            },
        )
        .unwrap();
        for (d, f) in direct.magnitudes().iter().zip(fast.magnitudes()) {
            assert_abs_diff_eq!(*d, *f, epsilon = 1e-3);
        }
    }
}
