//! Spectrogram heat map of a file.

use crate::audio_file::AudioClip;
use crate::commands::{transform_for, ImageSize};
use crate::config::AudiogramConfig;
use audiogram::dsp::{spectrogram, SpectrogramSettings, WindowFunction};
use audiogram::render::{draw_spectrogram, PixelBuffer, SpectrogramOptions};
use std::path::{Path, PathBuf};

/// Renders the spectrogram of `file` to the PNG at `output`.
///
/// Flags override the `[analysis]` section of the config.
///
/// # Errors
/// - If the file cannot be decoded
/// - If the window or hop size is zero
/// - If the image cannot be written
pub async fn handle_spectrogram(
    file: PathBuf,
    output: PathBuf,
    window: Option<usize>,
    hop: Option<usize>,
    window_fn: Option<WindowFunction>,
    size: ImageSize,
    fast: bool,
) -> anyhow::Result<()> {
    tracing::info!("=== audiogram Spectrogram Command ===");

    let config = AudiogramConfig::load()?;
    let clip = AudioClip::load(&file)?;

    let mut settings = config.analysis.spectrogram_settings();
    settings.window_size = window.unwrap_or(settings.window_size);
    settings.hop_size = hop.unwrap_or(settings.hop_size);
    settings.window = window_fn.unwrap_or(settings.window);
    settings.transform = transform_for(settings.window_size, settings.transform, fast);

    let (width, height) = size.resolve(&config.display);
    render_spectrogram_png(
        &clip.samples,
        clip.sample_rate,
        &settings,
        &config.spectrogram,
        (width, height),
        &output,
    )?;

    println!("Wrote {}", output.display());
    Ok(())
}

/// Computes a spectrogram and writes it as a PNG. Returns the frame count.
///
/// # Errors
/// - If the analysis parameters are invalid
/// - If the image cannot be written
pub fn render_spectrogram_png(
    samples: &[f32],
    sample_rate: u32,
    settings: &SpectrogramSettings,
    options: &SpectrogramOptions,
    (width, height): (u32, u32),
    output: &Path,
) -> anyhow::Result<usize> {
    tracing::info!(
        "Spectrogram: {} samples, window {}, hop {}, {:?} window, {} transform",
        samples.len(),
        settings.window_size,
        settings.hop_size,
        settings.window,
        settings.transform
    );
    let matrix = spectrogram(samples, sample_rate, settings)?;

    let mut image = PixelBuffer::new(width, height);
    let summary = draw_spectrogram(&mut image, &matrix, options);
    image
        .save_png(output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;
    tracing::info!(
        "Spectrogram written to {} ({} bins x {} frames, {} cells)",
        output.display(),
        matrix.bins(),
        matrix.frames(),
        summary.cells
    );
    Ok(matrix.frames())
}
