//! Signal analysis and raster rendering for digitized audio.
//!
//! The crate turns a mono sample buffer into the views an equalizer front end
//! needs: a magnitude spectrum in dB, a time-frequency spectrogram, a waveform
//! trace and a playback cursor, all drawn into any [`render::RenderTarget`].
//! It also encodes samples as a 16-bit PCM WAV container for playback.
//!
//! # Modules
//! - `dsp`: scale mapping, transforms, spectrum/spectrogram analysis, band equalizer
//! - `pcm`: byte-exact WAV encoding
//! - `render`: colour mapping, layout, and the three plot modes plus the position overlay

pub mod dsp;
pub mod error;
pub mod pcm;
pub mod render;

pub use dsp::{
    magnitude_spectrum, spectrogram, AnalysisOptions, ScaleMode, Spectrum, SpectrogramMatrix,
    SpectrogramSettings, TransformKind, WindowFunction,
};
pub use error::{AudiogramError, Result};
pub use pcm::encode_pcm16;
