//! Frequency-magnitude curve.

use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline};
use serde::{Deserialize, Serialize};

use super::axes::{self, point};
use super::color::Color;
use super::layout::{Padding, PlotArea};
use super::target::{Canvas, RenderTarget};
use super::PlotSummary;
use crate::dsp::{finite_range, ScaleMode, Spectrum};

/// Appearance of [`draw_frequency_graph`]. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyGraphOptions {
    pub padding: Padding,
    pub background: Color,
    pub axis_color: Color,
    pub grid_color: Color,
    pub line_color: Color,
    pub label_color: Color,
    pub line_width: u32,
    /// Grid divisions along the frequency axis.
    pub vertical_divisions: u32,
    /// Grid divisions along the magnitude axis.
    pub horizontal_divisions: u32,
    pub show_labels: bool,
}

impl Default for FrequencyGraphOptions {
    fn default() -> Self {
        Self {
            padding: Padding::new(20, 20, 40, 60),
            background: Color::rgb(0x1a, 0x1a, 0x1a),
            axis_color: Color::rgb(0x66, 0x66, 0x66),
            grid_color: Color::rgb(0x33, 0x33, 0x33),
            line_color: Color::rgb(0x1f, 0xd5, 0xf9),
            label_color: Color::WHITE,
            line_width: 2,
            vertical_divisions: 10,
            horizontal_divisions: 8,
            show_labels: true,
        }
    }
}

/// Plots `spectrum` as a connected curve over a grid.
///
/// x is the frequency mapped through `scale`, normalized by the mapped
/// min/max; y is the magnitude normalized by its min/max, where a flat
/// spectrum uses a range of 1 dB. Tick labels on the frequency axis are mapped back to Hz, so a
/// perceptual axis is labelled with the real frequency under each grid line.
///
/// Points with a non-finite magnitude break the curve.
pub fn draw_frequency_graph<T>(
    target: &mut T,
    spectrum: &Spectrum,
    scale: ScaleMode,
    options: &FrequencyGraphOptions,
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
    axes::draw_grid(
        &mut canvas,
        &area,
        options.vertical_divisions,
        options.horizontal_divisions,
        options.grid_color,
    );
    axes::draw_axes(&mut canvas, &area, options.axis_color);

    let mapped: Vec<f64> = spectrum
        .frequencies()
        .iter()
        .map(|&hz| scale.map(hz))
        .collect();
    let (Some((min_x, max_x)), Some((min_db, max_db))) =
        (finite_range(&mapped), spectrum.magnitude_range())
    else {
        return summary;
    };
    let x_range = nonzero(max_x - min_x);
    let db_range = nonzero(max_db - min_db);

    let (left, bottom) = (area.left as f64, area.bottom() as f64);
    let (width, height) = (area.width as f64, area.height as f64);

    let mut previous: Option<Point> = None;
    for (&x, &db) in mapped.iter().zip(spectrum.magnitudes()) {
        if !x.is_finite() || !db.is_finite() {
            previous = None;
            continue;
        }
        let current = point(
            left + (x - min_x) / x_range * width,
            bottom - (db - min_db) / db_range * height,
        );
        summary.points += 1;
        if let Some(from) = previous {
            axes::line(&mut canvas, from, current, options.line_color, options.line_width);
            summary.segments += 1;
        }
        previous = Some(current);
    }

    if options.show_labels {
        draw_labels(&mut canvas, &area, options, scale, (min_x, max_x), (min_db, max_db));
    }

    tracing::trace!(points = summary.points, segments = summary.segments, "Frequency graph drawn");
    summary
}

fn draw_labels<D>(
    canvas: &mut D,
    area: &PlotArea,
    options: &FrequencyGraphOptions,
    scale: ScaleMode,
    (min_x, max_x): (f64, f64),
    (min_db, max_db): (f64, f64),
) where
    D: DrawTarget<Color = Color, Error = std::convert::Infallible>,
{
    let (left, top) = (area.left as f64, area.top as f64);
    let (width, height) = (area.width as f64, area.height as f64);

    let vertical = options.vertical_divisions;
    if vertical > 0 {
        for i in 0..=vertical {
            let fraction = i as f64 / vertical as f64;
            let hz = scale.unmap(min_x + fraction * (max_x - min_x));
            axes::label(
                canvas,
                &format!("{} Hz", hz.round() as i64),
                point(left + fraction * width, area.bottom() as f64 + 5.0),
                options.label_color,
                Alignment::Center,
                Baseline::Top,
            );
        }
    }

    // Top of the plot carries the loudest value.
    let horizontal = options.horizontal_divisions;
    if horizontal > 0 {
        for i in 0..=horizontal {
            let fraction = i as f64 / horizontal as f64;
            let db = max_db - fraction * (max_db - min_db);
            axes::label(
                canvas,
                &format!("{} dB", db.round() as i64),
                point(left - 10.0, top + fraction * height),
                options.label_color,
                Alignment::Right,
                Baseline::Middle,
            );
        }
    }
}

fn nonzero(range: f64) -> f64 {
    if range == 0.0 {
        1.0
    } else {
        range
    }
}
