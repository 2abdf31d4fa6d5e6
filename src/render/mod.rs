//! Raster rendering of spectra, spectrograms and waveforms.
//!
//! Every renderer borrows a caller-owned [`RenderTarget`], clears it to the
//! background colour and draws into the plot area left after padding. Empty
//! input draws axes only; a target too small for a plot area is left with
//! just the background. Nothing here returns an error.

mod axes;
pub mod color;
pub mod colormap;
pub mod frequency;
pub mod layout;
pub mod overlay;
pub mod spectrogram;
pub mod target;
pub mod waveform;

pub use color::Color;
pub use colormap::heat_color;
pub use frequency::{draw_frequency_graph, FrequencyGraphOptions};
pub use layout::{Padding, PlotArea};
pub use overlay::{draw_position_marker, playback_fraction, MarkerOptions};
pub use spectrogram::{draw_spectrogram, SpectrogramOptions};
pub use target::{PixelBuffer, RenderTarget};
pub use waveform::{decimate, draw_waveform, WaveformOptions};

/// What a render call put on the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotSummary {
    /// Points on a curve or trace.
    pub points: usize,
    /// Line segments joining them.
    pub segments: usize,
    /// Spectrogram cells painted.
    pub cells: usize,
}
