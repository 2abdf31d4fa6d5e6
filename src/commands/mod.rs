//! Application command handlers for audiogram.
//!
//! # Commands
//! - `spectrum`: magnitude spectrum plot of a WAV file
//! - `spectrogram`: time-frequency heat map of a WAV file
//! - `waveform`: waveform plot with an optional playback marker
//! - `encode`: mono 16-bit PCM re-encode
//! - `equalize`: band equalizer with optional before/after spectrograms
//! - `view`: terminal waveform with a live playback cursor
//! - `config`: open the configuration file in the user's editor
//! - `logs`: display recent log entries

pub mod config;
pub mod encode;
pub mod equalize;
pub mod logs;
pub mod player;
pub mod spectrogram;
pub mod spectrum;
pub mod view;
pub mod waveform;

pub use config::handle_config;
pub use encode::handle_encode;
pub use equalize::handle_equalize;
pub use logs::handle_logs;
pub use spectrogram::handle_spectrogram;
pub use spectrum::handle_spectrum;
pub use view::handle_view;
pub use waveform::handle_waveform;

use audiogram::dsp::TransformKind;
use crate::config::DisplayConfig;

/// Largest transform length run with the direct transform from the command
/// line; longer ones switch to the fast transform.
pub const DIRECT_TRANSFORM_LIMIT: usize = 16384;

/// Output image size flags shared by the plotting commands.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct ImageSize {
    /// Image width in pixels (overrides config)
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Image height in pixels (overrides config)
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,
}

impl ImageSize {
    /// Flag values, falling back to the configured size.
    pub fn resolve(&self, display: &DisplayConfig) -> (u32, u32) {
        (
            self.width.unwrap_or(display.width),
            self.height.unwrap_or(display.height),
        )
    }
}

/// Picks the transform for a run of length `len`.
///
/// `--fast` always wins. Otherwise the configured kind is kept unless it is
/// the direct transform and `len` exceeds [`DIRECT_TRANSFORM_LIMIT`].
pub fn transform_for(len: usize, configured: TransformKind, fast: bool) -> TransformKind {
    if fast {
        return TransformKind::Fast;
    }
    if configured == TransformKind::Direct && len > DIRECT_TRANSFORM_LIMIT {
        tracing::warn!(
            "Direct transform of {len} points exceeds {DIRECT_TRANSFORM_LIMIT}; using the fast transform"
        );
        return TransformKind::Fast;
    }
    configured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_selection() {
        assert_eq!(transform_for(1024, TransformKind::Direct, false), TransformKind::Direct);
        assert_eq!(transform_for(1024, TransformKind::Direct, true), TransformKind::Fast);
        assert_eq!(
            transform_for(DIRECT_TRANSFORM_LIMIT * 2, TransformKind::Direct, false),
            TransformKind::Fast
        );
        assert_eq!(transform_for(1 << 20, TransformKind::Fast, false), TransformKind::Fast);
    }

    #[test]
    fn test_image_size_falls_back_to_config() {
        let display = DisplayConfig::default();
        let size = ImageSize {
            width: Some(640),
            height: None,
        };
        assert_eq!(size.resolve(&display), (640, display.height));
    }
}
