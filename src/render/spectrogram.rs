//! Spectrogram heat map.

use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline};
use serde::{Deserialize, Serialize};

use super::axes::{self, point};
use super::color::Color;
use super::colormap::heat_color;
use super::layout::{Padding, PlotArea};
use super::target::{Canvas, RenderTarget};
use super::PlotSummary;
use crate::dsp::SpectrogramMatrix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramOptions {
    pub padding: Padding,
    pub background: Color,
    pub axis_color: Color,
    pub label_color: Color,
    pub show_labels: bool,
    /// Tick count per axis, used when the matrix carries axis extents.
    pub ticks: u32,
}

impl Default for SpectrogramOptions {
    fn default() -> Self {
        Self {
            padding: Padding::new(30, 20, 40, 60),
            background: Color::rgb(0x1a, 0x1a, 0x1a),
            axis_color: Color::rgb(0x66, 0x66, 0x66),
            label_color: Color::WHITE,
            show_labels: true,
            ticks: 5,
        }
    }
}

/// Paints `matrix` as a heat map: time left to right, bin 0 at the bottom.
///
/// Values are normalized by the global min/max of the matrix and coloured
/// with [`heat_color`]. Each cell fills the pixels from its own start to the
/// next cell's start, so nothing is interpolated; when there are more cells
/// than pixels, later cells overwrite earlier ones.
pub fn draw_spectrogram<T>(
    target: &mut T,
    matrix: &SpectrogramMatrix,
    options: &SpectrogramOptions,
) -> PlotSummary
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
    if let (false, Some((min, max))) = (matrix.is_empty(), matrix.value_range()) {
        let range = if max > min { max - min } else { 1.0 };
        let (bins, frames) = (matrix.bins() as i64, matrix.frames() as i64);
        let (pw, ph) = (area.width as i64, area.height as i64);

        for bin in 0..matrix.bins() {
            let row = matrix.row(bin);
            let f = bin as i64;
            let y0 = (bins - 1 - f) * ph / bins;
            let y1 = (bins - f) * ph / bins;
            for (frame, &value) in row.iter().enumerate() {
                let t = frame as i64;
                let x0 = t * pw / frames;
                let x1 = (t + 1) * pw / frames;
                axes::fill_rect(
                    &mut canvas,
                    Point::new(area.left + x0 as i32, area.top + y0 as i32),
                    (x1 - x0).max(1) as u32,
                    (y1 - y0).max(1) as u32,
                    heat_color((value - min) / range),
                );
            }
        }
        summary.cells = matrix.bins() * matrix.frames();
    }

    axes::draw_axes(&mut canvas, &area, options.axis_color);

    if options.show_labels {
        if let Some(axis) = matrix.axis() {
            draw_ticks(&mut canvas, &area, options, axis.max_frequency_hz, axis.duration_secs);
        }
        axes::label(
            &mut canvas,
            "Time",
            Point::new(area.target_width / 2, area.target_height - 10),
            options.label_color,
            Alignment::Center,
            Baseline::Alphabetic,
        );
        axes::vertical_label(
            &mut canvas,
            "Frequency (Hz)",
            Point::new(15, area.target_height / 2),
            options.label_color,
        );
    }

    tracing::trace!(
        bins = matrix.bins(),
        frames = matrix.frames(),
        cells = summary.cells,
        "Spectrogram drawn"
    );
    summary
}

fn draw_ticks<D>(
    canvas: &mut D,
    area: &PlotArea,
    options: &SpectrogramOptions,
    max_hz: f64,
    duration: f64,
) where
    D: DrawTarget<Color = Color, Error = std::convert::Infallible>,
{
    if options.ticks < 2 {
        return;
    }
    let steps = (options.ticks - 1) as f64;
    let (left, bottom) = (area.left as f64, area.bottom() as f64);
    for i in 0..options.ticks {
        let fraction = i as f64 / steps;
        axes::label(
            canvas,
            &format!("{}", (fraction * max_hz).round() as i64),
            point(left - 4.0, bottom - fraction * area.height as f64),
            options.label_color,
            Alignment::Right,
            Baseline::Middle,
        );
        axes::label(
            canvas,
            &format!("{:.1}s", fraction * duration),
            point(left + fraction * area.width as f64, bottom + 4.0),
            options.label_color,
            Alignment::Center,
            Baseline::Top,
        );
    }
}
