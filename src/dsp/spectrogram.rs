//! Time-frequency analysis by sliding a window across the buffer.

use serde::{Deserialize, Serialize};

use super::spectrum::{finite_range, half_spectrum_db, to_signal};
use super::transform::{TransformKind, WindowFunction};
use super::FLOOR_DB;
use crate::error::{AudiogramError, Result};

/// Framing parameters for [`spectrogram`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpectrogramSettings {
    /// Samples per frame; also the transform length.
    pub window_size: usize,
    /// Samples between consecutive frame starts.
    pub hop_size: usize,
    /// Taper applied to every frame. Rectangular by default.
    pub window: WindowFunction,
    /// Transform implementation.
    pub transform: TransformKind,
}

impl Default for SpectrogramSettings {
    fn default() -> Self {
        Self {
            window_size: 1024,
            hop_size: 512,
            window: WindowFunction::default(),
            transform: TransformKind::default(),
        }
    }
}

impl SpectrogramSettings {
    /// Samples shared by consecutive frames. Negative when hops skip samples.
    pub fn overlap(&self) -> i64 {
        self.window_size as i64 - self.hop_size as i64
    }

    /// Number of frames produced for a buffer of `len` samples:
    /// `floor((len - overlap) / hop)`, never negative.
    pub fn frame_count(&self, len: usize) -> usize {
        if self.hop_size == 0 {
            return 0;
        }
        (len as i64 - self.overlap())
            .div_euclid(self.hop_size as i64)
            .max(0) as usize
    }

    fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.hop_size == 0 {
            return Err(AudiogramError::InvalidWindow {
                window: self.window_size,
                hop: self.hop_size,
            });
        }
        Ok(())
    }
}

/// Physical extent of a spectrogram, used for axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrogramAxis {
    /// Upper edge of the highest bin in Hz.
    pub max_frequency_hz: f64,
    /// Length of the analysed buffer in seconds.
    pub duration_secs: f64,
}

/// Dense `[bin][frame]` grid of dB magnitudes. Bin 0 is the lowest frequency.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrogramMatrix {
    bins: usize,
    frames: usize,
    data: Vec<f64>,
    axis: Option<SpectrogramAxis>,
}

impl SpectrogramMatrix {
    /// A matrix with `bins` rows and no frames.
    pub fn empty(bins: usize) -> Self {
        Self {
            bins,
            ..Default::default()
        }
    }

    /// Builds a matrix from externally computed rows, one per bin.
    ///
    /// Rows shorter than the longest one are padded with [`FLOOR_DB`] so every
    /// cell holds a value.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let bins = rows.len();
        let frames = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut data = Vec::with_capacity(bins * frames);
        for mut row in rows {
            row.resize(frames, FLOOR_DB);
            data.extend(row);
        }
        Self {
            bins,
            frames,
            data,
            axis: None,
        }
    }

    /// Attaches frequency and time extents for labelling.
    pub fn with_axis(mut self, axis: SpectrogramAxis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn axis(&self) -> Option<SpectrogramAxis> {
        self.axis
    }

    /// True when there is no cell to draw.
    pub fn is_empty(&self) -> bool {
        self.bins == 0 || self.frames == 0
    }

    /// Value at `bin`, `frame`.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn get(&self, bin: usize, frame: usize) -> f64 {
        assert!(bin < self.bins && frame < self.frames, "cell ({bin}, {frame}) out of range");
        self.data[bin * self.frames + frame]
    }

    /// All frames of one bin.
    pub fn row(&self, bin: usize) -> &[f64] {
        &self.data[bin * self.frames..(bin + 1) * self.frames]
    }

    /// Smallest and largest finite value over the whole grid.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.data)
    }
}

/// Computes the spectrogram of `samples`.
///
/// Frames start every `hop_size` samples; each one is transformed at
/// `window_size` and keeps the first `window_size / 2` bins, in the same dB
/// scale as [`magnitude_spectrum`](super::magnitude_spectrum). A trailing
/// partial frame is zero-padded. A buffer too short for one frame yields a
/// matrix with zero frames.
///
/// # Errors
/// - If `sample_rate` is zero
/// - If the window or hop size is zero
pub fn spectrogram(
    samples: &[f32],
    sample_rate: u32,
    settings: &SpectrogramSettings,
) -> Result<SpectrogramMatrix> {
    if sample_rate == 0 {
        return Err(AudiogramError::InvalidSampleRate { rate: sample_rate });
    }
    settings.validate()?;

    let window = settings.window_size;
    let bins = window / 2;
    let frames = settings.frame_count(samples.len());
    let axis = SpectrogramAxis {
        max_frequency_hz: bins as f64 * sample_rate as f64 / window as f64,
        duration_secs: samples.len() as f64 / sample_rate as f64,
    };

    if frames == 0 || bins == 0 {
        tracing::debug!(samples = samples.len(), window, "buffer too short for a spectrogram frame");
        return Ok(SpectrogramMatrix::empty(bins).with_axis(axis));
    }

    let signal = to_signal(samples);
    let transform = settings.transform.transform();
    let mut data = vec![FLOOR_DB; bins * frames];
    let mut frame = Vec::with_capacity(window);

    for t in 0..frames {
        let start = (t * settings.hop_size).min(signal.len());
        let end = (start + window).min(signal.len());

        frame.clear();
        frame.extend_from_slice(&signal[start..end]);
        frame.resize(window, 0.0);
        settings.window.apply(&mut frame);

        for (f, db) in half_spectrum_db(&frame, window, transform).into_iter().enumerate() {
            data[f * frames + t] = db;
        }
    }

    tracing::debug!(
        samples = samples.len(),
        bins,
        frames,
        window,
        hop = settings.hop_size,
        "spectrogram computed"
    );

    Ok(SpectrogramMatrix {
        bins,
        frames,
        data,
        axis: Some(axis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    fn small(window: usize, hop: usize) -> SpectrogramSettings {
        SpectrogramSettings {
            window_size: window,
            hop_size: hop,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_buffer_has_no_frames() {
        let matrix = spectrogram(&[], 44100, &SpectrogramSettings::default()).unwrap();
        assert_eq!(matrix.frames(), 0);
        assert_eq!(matrix.bins(), 512);
        assert!(matrix.is_empty());
        assert!(matrix.value_range().is_none());
    }

    #[test]
    fn test_frame_count_formula() {
        let settings = SpectrogramSettings::default();
        assert_eq!(settings.frame_count(0), 0);
        assert_eq!(settings.frame_count(511), 0);
        assert_eq!(settings.frame_count(1024), 1);
        assert_eq!(settings.frame_count(1535), 1);
        assert_eq!(settings.frame_count(1536), 2);
        assert_eq!(settings.frame_count(44100), 85);
        // Hop larger than the window: negative overlap
        assert_eq!(small(4, 8).frame_count(20), 3);
    }

    #[test]
    fn test_matrix_shape() {
        let samples = vec![0.1; 100];
        let matrix = spectrogram(&samples, 1000, &small(16, 8)).unwrap();
        assert_eq!(matrix.bins(), 8);
        assert_eq!(matrix.frames(), (100 - 8) / 8);
        let axis = matrix.axis().unwrap();
        assert_abs_diff_eq!(axis.max_frequency_hz, 500.0);
        assert_abs_diff_eq!(axis.duration_secs, 0.1);
    }

    #[test]
    fn test_tone_moves_between_frames() {
        let rate = 1024;
        // First half: 64 Hz, second half: 256 Hz, window 64 -> bin width 16 Hz
        let samples: Vec<f32> = (0..2048)
            .map(|i| {
                let f = if i < 1024 { 64.0 } else { 256.0 };
                (2.0 * PI * f * i as f32 / rate as f32).sin()
            })
            .collect();
        let matrix = spectrogram(&samples, rate, &small(64, 64)).unwrap();
        assert_eq!(matrix.frames(), 32);

        let loudest = |t: usize| {
            (0..matrix.bins())
                .max_by(|&a, &b| matrix.get(a, t).total_cmp(&matrix.get(b, t)))
                .unwrap()
        };
        assert_eq!(loudest(3), 4);
        assert_eq!(loudest(28), 16);
    }

    #[test]
    fn test_frames_match_single_spectrum() {
        let samples: Vec<f32> = (0..256).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let matrix = spectrogram(&samples, 8000, &small(64, 32)).unwrap();
        let options = crate::dsp::AnalysisOptions {
            analysis_size: Some(64),
            ..Default::default()
        };
        let second = crate::dsp::magnitude_spectrum(&samples[32..96], 8000, &options).unwrap();
        for (bin, &db) in second.magnitudes().iter().enumerate() {
            assert_abs_diff_eq!(matrix.get(bin, 1), db, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        assert_eq!(
            spectrogram(&[0.0; 10], 8000, &small(0, 4)),
            Err(AudiogramError::InvalidWindow { window: 0, hop: 4 })
        );
        assert!(spectrogram(&[0.0; 10], 8000, &small(4, 0)).is_err());
        assert!(spectrogram(&[0.0; 10], 0, &small(4, 2)).is_err());
    }

    #[test]
    fn test_from_rows_pads_ragged_input() {
        let matrix = SpectrogramMatrix::from_rows(vec![vec![-10.0, -20.0], vec![-5.0]]);
        assert_eq!(matrix.bins(), 2);
        assert_eq!(matrix.frames(), 2);
        assert_eq!(matrix.get(1, 1), FLOOR_DB);
        assert_eq!(matrix.row(0), &[-10.0, -20.0]);
        assert_eq!(matrix.value_range(), Some((FLOOR_DB, -5.0)));
    }

    #[test]
    fn test_hann_window_reduces_leakage() {
        let rate = 1000;
        // 117 Hz falls between bins at a 64-sample window (15.625 Hz bins)
        let samples: Vec<f32> = (0..64)
            .map(|i| (2.0 * PI * 117.0 * i as f32 / rate as f32).sin())
            .collect();
        let rect = spectrogram(&samples, rate, &small(64, 64)).unwrap();
        let hann = spectrogram(
            &samples,
            rate,
            &SpectrogramSettings {
                window: WindowFunction::Hann,
                ..small(64, 64)
            },
        )
        .unwrap();
        assert!(hann.get(25, 0) < rect.get(25, 0));
    }
}
