//! Error handling for the analysis and encoding core.
//!
//! Degenerate input (empty buffers, zero-sized targets, flat magnitude ranges)
//! is never reported here; those cases have defined degraded output. Only
//! structural parameters that would make a computation meaningless are errors.

use thiserror::Error;

/// Convenient result alias for core operations.
pub type Result<T> = std::result::Result<T, AudiogramError>;

/// Errors raised before any computation begins.
#[derive(Debug, Error, PartialEq)]
pub enum AudiogramError {
    /// Sample rate is zero or too large to describe in a WAV header.
    #[error("invalid sample rate {rate} Hz")]
    InvalidSampleRate {
        /// Rate supplied by the caller.
        rate: u32,
    },
    /// Analysis window or hop size is zero.
    #[error("invalid analysis window: window {window}, hop {hop}")]
    InvalidWindow {
        /// Window length in samples.
        window: usize,
        /// Step between frames in samples.
        hop: usize,
    },
    /// Explicit analysis size of zero.
    #[error("invalid analysis size {size}")]
    InvalidAnalysisSize {
        /// Size supplied by the caller.
        size: usize,
    },
    /// Frequency and magnitude arrays differ in length.
    #[error("spectrum has {frequencies} frequencies but {magnitudes} magnitudes")]
    SpectrumShape {
        /// Number of frequency values.
        frequencies: usize,
        /// Number of magnitude values.
        magnitudes: usize,
    },
    /// Sample payload does not fit the 32-bit size fields of the container.
    #[error("{samples} samples exceed the WAV size limit")]
    PayloadTooLarge {
        /// Number of samples requested.
        samples: usize,
    },
    /// Equalizer band with an unusable range or gain.
    #[error("invalid band '{label}': {reason}")]
    InvalidBand {
        /// Band label.
        label: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Colour string that is not `#rrggbb` or `#rrggbbaa`.
    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
}
