//! Frequency-domain band equalizer.
//!
//! The whole buffer is transformed once, every band scales its bins (and the
//! mirrored negative-frequency bins), and the inverse transform yields the
//! processed signal.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::spectrum::to_signal;
use super::transform::TransformKind;
use crate::error::{AudiogramError, Result};

/// A frequency range and the linear gain applied to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Band {
    #[serde(default)]
    pub label: String,
    pub start_hz: f64,
    pub end_hz: f64,
    /// Linear scale factor; 1.0 leaves the band untouched.
    #[serde(default = "default_gain")]
    pub gain: f64,
}

fn default_gain() -> f64 {
    1.0
}

impl Band {
    pub fn new(label: impl Into<String>, start_hz: f64, end_hz: f64, gain: f64) -> Self {
        Self {
            label: label.into(),
            start_hz,
            end_hz,
            gain,
        }
    }

    fn validate(&self) -> Result<()> {
        let reason = if !(self.start_hz.is_finite() && self.end_hz.is_finite()) {
            "range must be finite"
        } else if self.start_hz < 0.0 {
            "start frequency is negative"
        } else if self.start_hz > self.end_hz {
            "start frequency is above end frequency"
        } else if !self.gain.is_finite() || self.gain < 0.0 {
            "gain must be a finite, non-negative factor"
        } else {
            return Ok(());
        };
        Err(AudiogramError::InvalidBand {
            label: self.label.clone(),
            reason: reason.to_string(),
        })
    }

    /// Half-open bin range `[start, end)` covered at transform length `len`.
    fn bin_range(&self, sample_rate: u32, len: usize) -> (usize, usize) {
        let step = sample_rate as f64 / len as f64;
        let half = len / 2;
        let start = ((self.start_hz / step).floor() as usize).min(half);
        let end = ((self.end_hz / step).ceil() as usize).min(half);
        (start, end)
    }
}

/// Parses `START:END:GAIN`, e.g. `20:250:1.5`.
impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(format!("Invalid band '{s}': expected START:END:GAIN"));
        }
        let parse = |v: &str, what: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("Invalid {what} in band '{s}': {e}"))
        };
        let start_hz = parse(parts[0], "start frequency")?;
        let end_hz = parse(parts[1], "end frequency")?;
        let gain = parse(parts[2], "gain")?;
        Ok(Band::new(format!("{start_hz}-{end_hz} Hz"), start_hz, end_hz, gain))
    }
}

/// Preset band layouts, all at unit gain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EqualizerMode {
    /// One band over 20 Hz - 1 kHz
    #[default]
    Generic,
    /// Bass, vocals and treble
    Musical,
}

impl FromStr for EqualizerMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "musical" => Ok(Self::Musical),
            other => Err(format!("Unknown mode '{other}': expected generic or musical")),
        }
    }
}

impl EqualizerMode {
    pub fn bands(self) -> Vec<Band> {
        match self {
            Self::Generic => vec![Band::new("Generic Band 1", 20.0, 1000.0, 1.0)],
            Self::Musical => vec![
                Band::new("Bass (20-250 Hz)", 20.0, 250.0, 1.0),
                Band::new("Vocals/Mid (250-4k Hz)", 250.0, 4000.0, 1.0),
                Band::new("Treble (4k-20k Hz)", 4000.0, 20000.0, 1.0),
            ],
        }
    }
}

/// Applies `bands` to `samples` and returns the processed buffer.
///
/// The transform length is the next power of two at or above the buffer
/// length; the output is truncated back to the input length. With no bands
/// the input is reconstructed up to rounding.
///
/// # Errors
/// - If `sample_rate` is zero
/// - If any band has a negative, inverted or non-finite range or gain
pub fn equalize(
    samples: &[f32],
    sample_rate: u32,
    bands: &[Band],
    kind: TransformKind,
) -> Result<Vec<f32>> {
    if sample_rate == 0 {
        return Err(AudiogramError::InvalidSampleRate { rate: sample_rate });
    }
    for band in bands {
        band.validate()?;
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let len = samples.len().next_power_of_two();
    let transform = kind.transform();
    let mut spectrum = transform.forward(&to_signal(samples), len, len);

    for band in bands {
        let (start, end) = band.bin_range(sample_rate, len);
        for k in start..end {
            spectrum[k] *= band.gain;
            // DC has no mirror image
            if k > 0 {
                spectrum[len - k] *= band.gain;
            }
        }
        tracing::debug!(
            band = %band.label,
            gain = band.gain,
            bins = end.saturating_sub(start),
            "band applied"
        );
    }

    Ok(transform
        .inverse(&spectrum)
        .into_iter()
        .take(samples.len())
        .map(|c| c.re as f32)
        .collect())
}

/// Scales `samples` down so the peak magnitude is at most 1.0.
///
/// Returns the factor applied (1.0 when nothing changed).
pub fn normalize_peak(samples: &mut [f32]) -> f32 {
    let peak = samples
        .iter()
        .filter(|s| s.is_finite())
        .fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak <= 1.0 {
        return 1.0;
    }
    let scale = peak.recip();
    samples.iter_mut().for_each(|s| *s *= scale);
    scale
}
