//! WAV file input and output for the command-line tools.
//!
//! Decoding goes through hound; every format hound reads (8-32 bit integer,
//! 32-bit float, any channel count) is downmixed to mono `f32` in [-1, 1].

use anyhow::Context;
use hound::{SampleFormat, WavReader};
use std::fs;
use std::path::Path;

/// A decoded mono buffer and its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source file before downmixing.
    pub channels: u16,
}

impl AudioClip {
    /// Decodes the WAV file at `path`.
    ///
    /// # Errors
    /// - If the file cannot be opened or is not a valid WAV container
    /// - If a sample cannot be decoded
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open audio file {}", path.display()))?;
        let spec = reader.spec();
        tracing::debug!(
            "Decoding {}: {} Hz, {} channel(s), {} bit {:?}",
            path.display(),
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            spec.sample_format
        );

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to decode {}", path.display()))?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .with_context(|| format!("Failed to decode {}", path.display()))?
            }
        };

        let samples = downmix(&interleaved, spec.channels);
        tracing::info!(
            "Loaded {} ({} samples, {:.2}s)",
            path.display(),
            samples.len(),
            samples.len() as f64 / spec.sample_rate.max(1) as f64
        );

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Averages interleaved frames into one channel. A trailing partial frame is dropped.
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n as usize)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect(),
    }
}

/// Writes encoded bytes to `path`, creating parent directories.
///
/// # Errors
/// - If the directory or file cannot be written
pub fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
