//! Drawing primitives shared by the plot modes: background, axes, grid lines
//! and text labels.

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use std::convert::Infallible;

use super::color::Color;
use super::layout::PlotArea;
use super::target::Rotated;

/// Unwraps a draw result whose error type cannot be constructed.
pub(crate) fn drawn<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Rounds a plot-space coordinate to the nearest pixel.
pub(crate) fn point(x: f64, y: f64) -> Point {
    Point::new(pixel(x), pixel(y))
}

fn pixel(v: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    v.round() as i32
}

pub(crate) fn line<D>(target: &mut D, from: Point, to: Point, color: Color, width: u32)
where
    D: DrawTarget<Color = Color, Error = Infallible>,
{
    if width == 0 {
        return;
    }
    drawn(
        Line::new(from, to)
            .into_styled(PrimitiveStyle::with_stroke(color, width))
            .draw(target),
    );
}

pub(crate) fn fill_rect<D>(target: &mut D, top_left: Point, width: u32, height: u32, color: Color)
where
    D: DrawTarget<Color = Color, Error = Infallible>,
{
    drawn(
        Rectangle::new(top_left, Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(target),
    );
}

/// The x axis along the bottom edge and the y axis along the left edge.
pub(crate) fn draw_axes<D>(target: &mut D, area: &PlotArea, color: Color)
where
    D: DrawTarget<Color = Color, Error = Infallible>,
{
    let bottom = area.bottom();
    line(
        target,
        Point::new(area.left, bottom),
        Point::new(area.right(), bottom),
        color,
        1,
    );
    line(
        target,
        Point::new(area.left, area.top),
        Point::new(area.left, bottom),
        color,
        1,
    );
}

/// Evenly spaced grid, drawn inclusively: `divisions + 1` lines per direction.
pub(crate) fn draw_grid<D>(
    target: &mut D,
    area: &PlotArea,
    vertical: u32,
    horizontal: u32,
    color: Color,
) where
    D: DrawTarget<Color = Color, Error = Infallible>,
{
    let (left, top) = (area.left as f64, area.top as f64);
    let (width, height) = (area.width as f64, area.height as f64);
    if vertical > 0 {
        for i in 0..=vertical {
            let x = left + i as f64 / vertical as f64 * width;
            line(target, point(x, top), point(x, top + height), color, 1);
        }
    }
    if horizontal > 0 {
        for i in 0..=horizontal {
            let y = top + i as f64 / horizontal as f64 * height;
            line(target, point(left, y), point(left + width, y), color, 1);
        }
    }
}

/// Draws `text` anchored at `position`.
pub(crate) fn label<D>(
    target: &mut D,
    text: &str,
    position: Point,
    color: Color,
    alignment: Alignment,
    baseline: Baseline,
) where
    D: DrawTarget<Color = Color, Error = Infallible>,
{
    let character_style = MonoTextStyle::new(&FONT_6X10, color);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    drawn(Text::with_text_style(text, position, character_style, text_style).draw(target));
}

/// Draws `text` centred on `center`, reading bottom to top.
pub(crate) fn vertical_label<D>(target: &mut D, text: &str, center: Point, color: Color)
where
    D: DrawTarget<Color = Color, Error = Infallible>,
{
    let mut rotated = Rotated::new(target, center);
    label(
        &mut rotated,
        text,
        Point::zero(),
        color,
        Alignment::Center,
        Baseline::Middle,
    );
}
