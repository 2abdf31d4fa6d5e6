//! Playback-position marker drawn on top of a waveform.

use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

use super::axes;
use super::color::Color;
use super::layout::{Padding, PlotArea};
use super::target::{Canvas, RenderTarget};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerOptions {
    /// Should match the padding of the waveform underneath.
    pub padding: Padding,
    pub color: Color,
    pub line_width: u32,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            padding: Padding::new(20, 20, 40, 20),
            color: Color::rgb(0xff, 0x00, 0x00),
            line_width: 2,
        }
    }
}

/// Converts a playback time into a position along the plot, clamped to [0, 1].
///
/// A non-positive or non-finite duration gives 0.
pub fn playback_fraction(seconds: f64, duration: f64) -> f64 {
    if !(duration.is_finite() && duration > 0.0) {
        return 0.0;
    }
    clamp_unit(seconds / duration)
}

/// Draws a vertical marker at `position` (0 = left edge, 1 = right edge of
/// the plot), spanning the plot height. Existing pixels outside the marker are
/// left alone.
///
/// Returns whether anything was drawn: an absent target or a plot area with
/// no room is a no-op.
pub fn draw_position_marker<T>(target: Option<&mut T>, position: f64, options: &MarkerOptions) -> bool
where
    T: RenderTarget + ?Sized,
{
    let Some(target) = target else {
        return false;
    };
    let area = PlotArea::new(target.width(), target.height(), &options.padding);
    if !area.is_drawable() {
        return false;
    }

    let position = clamp_unit(position);
    let x = (area.left as f64 + position * area.width as f64).round() as i32;
    let width = options.line_width.max(1);
    let start = x - (width as i32 - 1) / 2;
    axes::fill_rect(
        &mut Canvas::new(target),
        Point::new(start, area.top),
        width,
        area.height as u32 + 1,
        options.color,
    );
    true
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::target::PixelBuffer;
    use crate::render::waveform::{draw_waveform, WaveformOptions};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_playback_fraction() {
        assert_abs_diff_eq!(playback_fraction(5.0, 10.0), 0.5);
        assert_abs_diff_eq!(playback_fraction(-1.0, 10.0), 0.0);
        assert_abs_diff_eq!(playback_fraction(20.0, 10.0), 1.0);
        assert_abs_diff_eq!(playback_fraction(1.0, 0.0), 0.0);
        assert_abs_diff_eq!(playback_fraction(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_marker_column() {
        let options = MarkerOptions::default();
        let mut buffer = PixelBuffer::new(140, 100);
        assert!(draw_position_marker(Some(&mut buffer), 0.5, &options));

        // left 20 + 0.5 * 100
        for y in 20..=60 {
            assert_eq!(buffer.pixel(70, y), Some(options.color));
        }
        assert_eq!(buffer.pixel(70, 19), Some(Color::TRANSPARENT));
        assert_eq!(buffer.pixel(70, 61), Some(Color::TRANSPARENT));
        assert_eq!(buffer.pixel(68, 40), Some(Color::TRANSPARENT));
        assert_eq!(buffer.pixel(72, 40), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_position_is_clamped() {
        let options = MarkerOptions {
            line_width: 1,
            ..Default::default()
        };
        let mut buffer = PixelBuffer::new(140, 100);
        draw_position_marker(Some(&mut buffer), 7.0, &options);
        draw_position_marker(Some(&mut buffer), -3.0, &options);
        assert_eq!(buffer.pixel(120, 40), Some(options.color));
        assert_eq!(buffer.pixel(20, 40), Some(options.color));
    }

    #[test]
    fn test_marker_keeps_waveform() {
        let waveform = WaveformOptions::default();
        let mut buffer = PixelBuffer::new(140, 100);
        draw_waveform(&mut buffer, &[0.0; 64], &waveform);
        draw_position_marker(Some(&mut buffer), 0.25, &MarkerOptions::default());

        assert_eq!(buffer.pixel(0, 0), Some(waveform.background));
        assert_eq!(buffer.pixel(100, 40), Some(waveform.center_line_color));
        assert_eq!(buffer.pixel(45, 40), Some(MarkerOptions::default().color));
    }

    #[test]
    fn test_absent_or_tiny_target() {
        let options = MarkerOptions::default();
        assert!(!draw_position_marker::<PixelBuffer>(None, 0.5, &options));
        let mut buffer = PixelBuffer::new(1, 1);
        assert!(!draw_position_marker(Some(&mut buffer), 0.5, &options));
        assert_eq!(buffer.pixel(0, 0), Some(Color::TRANSPARENT));
    }
}
