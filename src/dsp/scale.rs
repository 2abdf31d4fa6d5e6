//! Linear frequency to Mel ("audiogram") scale mapping.

use serde::{Deserialize, Serialize};

/// Standard pure-tone audiometry test frequencies in Hz.
const AUDIOGRAM_FREQUENCIES: [f64; 11] = [
    125.0, 250.0, 500.0, 750.0, 1000.0, 1500.0, 2000.0, 3000.0, 4000.0, 6000.0, 8000.0,
];

/// Frequency axis used for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Hz, unchanged
    #[default]
    Linear,
    /// Mel scale
    #[serde(alias = "audiogram", alias = "mel")]
    Perceptual,
}

impl ScaleMode {
    /// Maps a frequency in Hz onto this axis.
    pub fn map(self, hz: f64) -> f64 {
        match self {
            Self::Linear => hz,
            Self::Perceptual => to_perceptual(hz),
        }
    }

    /// Maps an axis value back to Hz.
    pub fn unmap(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Perceptual => to_linear(value),
        }
    }
}

impl std::fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Perceptual => write!(f, "perceptual"),
        }
    }
}

impl std::str::FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "perceptual" | "audiogram" | "mel" => Ok(Self::Perceptual),
            other => Err(format!("Unknown scale '{other}': expected linear or perceptual")),
        }
    }
}

/// Converts Hz to Mel: `2595 * log10(1 + hz / 700)`.
pub fn to_perceptual(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts Mel back to Hz: `700 * (10^(mel / 2595) - 1)`.
pub fn to_linear(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Applies `mode` to every frequency.
pub fn map_sequence(frequencies: &[f64], mode: ScaleMode) -> Vec<f64> {
    frequencies.iter().map(|&hz| mode.map(hz)).collect()
}

/// Returns the audiogram test frequencies representable at `sample_rate`.
pub fn audiogram_frequencies(sample_rate: u32) -> Vec<f64> {
    let nyquist = sample_rate as f64 / 2.0;
    AUDIOGRAM_FREQUENCIES
        .iter()
        .copied()
        .filter(|&hz| hz <= nyquist)
        .collect()
}
