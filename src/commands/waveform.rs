//! Waveform plot of a file, optionally with a playback marker.

use crate::audio_file::AudioClip;
use crate::commands::ImageSize;
use crate::config::AudiogramConfig;
use audiogram::render::{
    draw_position_marker, draw_waveform, playback_fraction, PixelBuffer,
};
use std::path::PathBuf;

/// Plots the waveform of `file` to the PNG at `output`.
///
/// With `position` (seconds), a marker is drawn over the trace at that point
/// of the file.
///
/// # Errors
/// - If the file cannot be decoded
/// - If the image cannot be written
pub async fn handle_waveform(
    file: PathBuf,
    output: PathBuf,
    position: Option<f64>,
    size: ImageSize,
) -> anyhow::Result<()> {
    tracing::info!("=== audiogram Waveform Command ===");

    let config = AudiogramConfig::load()?;
    let clip = AudioClip::load(&file)?;
    let (width, height) = size.resolve(&config.display);

    let mut image = PixelBuffer::new(width, height);
    let summary = draw_waveform(&mut image, &clip.samples, &config.waveform);
    tracing::info!(
        "Waveform: {} samples decimated to {} points",
        clip.samples.len(),
        summary.points
    );

    if let Some(seconds) = position {
        let fraction = playback_fraction(seconds, clip.duration_secs());
        let drawn = draw_position_marker(Some(&mut image), fraction, &config.marker);
        tracing::info!("Marker at {seconds:.2}s ({fraction:.3}), drawn: {drawn}");
    }

    image
        .save_png(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
