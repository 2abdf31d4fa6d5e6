//! Magnitude spectrum of a whole file, rendered as a frequency graph.

use crate::audio_file::AudioClip;
use crate::commands::{transform_for, ImageSize};
use crate::config::AudiogramConfig;
use audiogram::dsp::{audiogram_frequencies, magnitude_spectrum, ScaleMode};
use audiogram::render::{draw_frequency_graph, PixelBuffer};
use std::path::PathBuf;

/// Plots the magnitude spectrum of `file` to the PNG at `output`.
///
/// # Arguments
/// * `scale` - Frequency axis; defaults to the configured scale
/// * `analysis_size` - Transform length; defaults to the next power of two
/// * `fast` - Use the fast transform regardless of size
///
/// # Errors
/// - If the file cannot be decoded
/// - If the analysis parameters are invalid
/// - If the image cannot be written
pub async fn handle_spectrum(
    file: PathBuf,
    output: PathBuf,
    scale: Option<ScaleMode>,
    analysis_size: Option<usize>,
    size: ImageSize,
    fast: bool,
) -> anyhow::Result<()> {
    tracing::info!("=== audiogram Spectrum Command ===");

    let config = AudiogramConfig::load()?;
    let clip = AudioClip::load(&file)?;

    let mut options = config.analysis.analysis_options();
    if analysis_size.is_some() {
        options.analysis_size = analysis_size;
    }
    let len = options
        .analysis_size
        .unwrap_or_else(|| clip.samples.len().next_power_of_two());
    options.transform = transform_for(len, options.transform, fast);

    let scale = scale.unwrap_or(config.display.scale);
    let (width, height) = size.resolve(&config.display);
    tracing::info!(
        "Analysing {} samples at {} Hz: {} points, {} transform, {} scale",
        clip.samples.len(),
        clip.sample_rate,
        len,
        options.transform,
        scale
    );

    let spectrum = magnitude_spectrum(&clip.samples, clip.sample_rate, &options)?;

    let mut image = PixelBuffer::new(width, height);
    let summary = draw_frequency_graph(&mut image, &spectrum, scale, &config.frequency_graph);
    image
        .save_png(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;
    tracing::info!(
        "Spectrum written to {} ({} segments)",
        output.display(),
        summary.segments
    );

    if let Some((hz, db)) = spectrum.peak() {
        println!("Peak: {hz:.1} Hz at {db:.1} dB");
    }
    if scale == ScaleMode::Perceptual {
        println!("Audiogram levels:");
        for hz in audiogram_frequencies(clip.sample_rate) {
            if let Some(db) = spectrum.level_at(hz) {
                println!("  {hz:>5.0} Hz  {db:7.1} dB");
            }
        }
    }
    println!("Wrote {}", output.display());
    Ok(())
}
