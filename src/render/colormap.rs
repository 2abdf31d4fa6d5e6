//! Heat-map colour mapping for spectrogram cells.

use super::color::Color;

/// Maps `value` in [0, 1] onto a blue → cyan → yellow → red gradient.
///
/// Four equal-width segments, each ramping one channel. Values outside the
/// range are clamped and NaN counts as 0. Channels are truncated to integers.
pub fn heat_color(value: f64) -> Color {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };

    // `as u8` truncates and saturates, so ramps never leave [0, 255].
    if v < 0.25 {
        let t = v / 0.25;
        Color::rgb(0, (t * 255.0) as u8, 255)
    } else if v < 0.5 {
        let t = (v - 0.25) / 0.25;
        Color::rgb(0, 255, (255.0 * (1.0 - t)) as u8)
    } else if v < 0.75 {
        let t = (v - 0.5) / 0.25;
        Color::rgb((t * 255.0) as u8, 255, 0)
    } else {
        let t = (v - 0.75) / 0.25;
        Color::rgb(255, (255.0 * (1.0 - t)) as u8, 0)
    }
}
