//! Frequency analysis of sample buffers.
//!
//! Everything here is a pure function of its inputs: no planner caches, no
//! smoothing history. Callers own the sample buffers and the results.

pub mod equalizer;
pub mod scale;
pub mod spectrogram;
pub mod spectrum;
pub mod transform;

pub use equalizer::{equalize, normalize_peak, Band, EqualizerMode};
pub use scale::{audiogram_frequencies, map_sequence, to_linear, to_perceptual, ScaleMode};
pub use spectrogram::{spectrogram, SpectrogramAxis, SpectrogramMatrix, SpectrogramSettings};
pub use spectrum::{magnitude_spectrum, AnalysisOptions, Spectrum};
pub(crate) use spectrum::finite_range;
pub use transform::{TransformKind, WindowFunction};

/// Offset added to normalized magnitudes before taking the logarithm.
pub const MAGNITUDE_EPSILON: f64 = 1e-12;

/// dB value of a bin with no energy at all, `20 * log10(MAGNITUDE_EPSILON)`.
pub const FLOOR_DB: f64 = -240.0;

/// Converts a linear magnitude normalized by `half_len` to dB.
pub(crate) fn to_db(magnitude: f64, half_len: f64) -> f64 {
    20.0 * (magnitude / half_len + MAGNITUDE_EPSILON).log10()
}
