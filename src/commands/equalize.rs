//! Band equalizer over a whole file.
//!
//! With `--render`, spectrograms of the input and the processed output are
//! rendered side by side on tokio's blocking pool. The two renders share no
//! state: each owns its samples and its own pixel buffer.

use crate::audio_file::{write_bytes, AudioClip};
use crate::commands::spectrogram::render_spectrogram_png;
use crate::commands::transform_for;
use crate::config::AudiogramConfig;
use audiogram::dsp::{equalize, normalize_peak, Band, EqualizerMode, SpectrogramSettings};
use audiogram::pcm::encode_pcm16;
use audiogram::render::SpectrogramOptions;
use std::path::{Path, PathBuf};

/// Equalizes `file` and writes the result as a 16-bit PCM WAV to `output`.
///
/// Explicit `bands` replace the preset of `mode`. A result that would clip is
/// scaled down to a peak of 1.0.
///
/// # Errors
/// - If the file cannot be decoded
/// - If a band is invalid
/// - If the output or the rendered images cannot be written
pub async fn handle_equalize(
    file: PathBuf,
    output: PathBuf,
    mode: Option<EqualizerMode>,
    bands: Vec<Band>,
    render_dir: Option<PathBuf>,
    fast: bool,
) -> anyhow::Result<()> {
    tracing::info!("=== audiogram Equalize Command ===");

    let config = AudiogramConfig::load()?;
    let clip = AudioClip::load(&file)?;

    let bands = if bands.is_empty() {
        let mode = mode.unwrap_or_default();
        tracing::info!("Using {mode:?} preset bands");
        mode.bands()
    } else {
        bands
    };
    for band in &bands {
        tracing::info!(
            "Band '{}': {}-{} Hz x {}",
            band.label,
            band.start_hz,
            band.end_hz,
            band.gain
        );
    }

    let transform = transform_for(
        clip.samples.len().next_power_of_two(),
        config.analysis.transform,
        fast,
    );
    let mut processed = equalize(&clip.samples, clip.sample_rate, &bands, transform)?;
    let scale = normalize_peak(&mut processed);
    if scale < 1.0 {
        tracing::warn!("Output peaked at {:.3}; normalized to 1.0", scale.recip());
    }

    let bytes = encode_pcm16(&processed, clip.sample_rate)?;
    write_bytes(&output, &bytes)?;
    println!("Wrote {}", output.display());

    if let Some(dir) = render_dir {
        let mut settings = config.analysis.spectrogram_settings();
        settings.transform = transform_for(settings.window_size, settings.transform, fast);
        let (input_png, output_png) = render_before_after(
            clip.samples,
            processed,
            clip.sample_rate,
            settings,
            config.spectrogram.clone(),
            (config.display.width, config.display.height),
            &dir,
        )
        .await?;
        println!("Wrote {}", input_png.display());
        println!("Wrote {}", output_png.display());
    }

    Ok(())
}

/// Renders `input.png` and `output.png` spectrograms into `dir` concurrently.
///
/// # Errors
/// - If the directory cannot be created
/// - If either render fails or its task panics
pub async fn render_before_after(
    input: Vec<f32>,
    output: Vec<f32>,
    sample_rate: u32,
    settings: SpectrogramSettings,
    options: SpectrogramOptions,
    size: (u32, u32),
    dir: &Path,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", dir.display()))?;
    let input_png = dir.join("input.png");
    let output_png = dir.join("output.png");

    let input_task = {
        let (path, options) = (input_png.clone(), options.clone());
        tokio::task::spawn_blocking(move || {
            render_spectrogram_png(&input, sample_rate, &settings, &options, size, &path)
        })
    };
    let output_task = {
        let path = output_png.clone();
        tokio::task::spawn_blocking(move || {
            render_spectrogram_png(&output, sample_rate, &settings, &options, size, &path)
        })
    };

    let (input_frames, output_frames) = tokio::try_join!(input_task, output_task)
        .map_err(|e| anyhow::anyhow!("Spectrogram render task failed: {e}"))?;
    let (input_frames, output_frames) = (input_frames?, output_frames?);
    tracing::debug!(
        "Rendered before/after spectrograms: {input_frames} and {output_frames} frames"
    );

    Ok((input_png, output_png))
}
