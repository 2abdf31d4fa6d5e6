//! Time-domain waveform trace.

use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

use super::axes::{self, point};
use super::color::Color;
use super::layout::{Padding, PlotArea};
use super::target::{Canvas, RenderTarget};
use super::PlotSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformOptions {
    pub padding: Padding,
    pub background: Color,
    pub line_color: Color,
    pub line_width: u32,
    pub center_line_color: Color,
    pub axis_color: Color,
}

impl Default for WaveformOptions {
    fn default() -> Self {
        Self {
            padding: Padding::new(20, 20, 40, 20),
            background: Color::rgb(0x1a, 0x1a, 0x1a),
            line_color: Color::rgb(0x1f, 0xd5, 0xf9),
            line_width: 1,
            center_line_color: Color::rgb(0x66, 0x66, 0x66),
            axis_color: Color::rgb(0x66, 0x66, 0x66),
        }
    }
}

/// Picks at most `max_points` samples at a fixed stride spanning the whole
/// buffer.
///
/// The stride is `max(1, len / max_points)` when that stays within
/// `max_points`, otherwise `ceil(len / max_points)`, so the last kept sample
/// is always within one stride of the end.
///
/// Display-only: there is no low-pass filtering, so high-frequency content
/// aliases. Non-finite samples come out as 0.
pub fn decimate(samples: &[f32], max_points: usize) -> Vec<f32> {
    if max_points == 0 {
        return Vec::new();
    }
    let len = samples.len();
    let mut step = (len / max_points).max(1);
    if len.div_ceil(step) > max_points {
        step = len.div_ceil(max_points);
    }
    samples
        .iter()
        .step_by(step)
        .map(|&s| if s.is_finite() { s } else { 0.0 })
        .collect()
}

/// Plots `samples` as a connected trace, one point per decimated sample.
///
/// The trace is scaled by the min/max of the decimated points and centred on
/// their midpoint. The horizontal centre line and the axes are drawn even
/// when `samples` is empty.
pub fn draw_waveform<T>(target: &mut T, samples: &[f32], options: &WaveformOptions) -> PlotSummary
where
    T: RenderTarget + ?Sized,
{
    target.fill(options.background);
    let area = PlotArea::new(target.width(), target.height(), &options.padding);
    let mut summary = PlotSummary::default();
    if !area.is_drawable() {
        return summary;
    }

    let mut canvas = Canvas::new(target);
    let points = decimate(samples, area.width as usize);
    let (left, top) = (area.left as f64, area.top as f64);
    let (width, height) = (area.width as f64, area.height as f64);
    let center_y = top + height / 2.0;

    if let Some((min, max)) = min_max(&points) {
        let range = if max > min { (max - min) as f64 } else { 1.0 };
        let mid = (min as f64 + max as f64) / 2.0;
        let last = (points.len() - 1).max(1) as f64;

        let mut previous: Option<Point> = None;
        for (i, &sample) in points.iter().enumerate() {
            let current = point(
                left + i as f64 / last * width,
                center_y - (sample as f64 - mid) / range * (height / 2.0),
            );
            if let Some(from) = previous {
                axes::line(&mut canvas, from, current, options.line_color, options.line_width);
                summary.segments += 1;
            }
            previous = Some(current);
        }
        summary.points = points.len();
    }

    axes::line(
        &mut canvas,
        point(left, center_y),
        point(left + width, center_y),
        options.center_line_color,
        1,
    );
    axes::draw_axes(&mut canvas, &area, options.axis_color);

    tracing::trace!(
        samples = samples.len(),
        points = summary.points,
        "Waveform drawn"
    );
    summary
}

fn min_max(points: &[f32]) -> Option<(f32, f32)> {
    points.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
