//! Re-encode a file as mono 16-bit PCM.

use crate::audio_file::{write_bytes, AudioClip};
use audiogram::pcm::encode_pcm16;
use std::path::PathBuf;

/// Decodes `file`, downmixes it to mono and writes a 16-bit PCM WAV to `output`.
///
/// # Errors
/// - If the file cannot be decoded
/// - If the sample rate or length cannot be represented in the header
/// - If the output cannot be written
pub async fn handle_encode(file: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    tracing::info!("=== audiogram Encode Command ===");

    let clip = AudioClip::load(&file)?;
    let bytes = encode_pcm16(&clip.samples, clip.sample_rate)?;
    write_bytes(&output, &bytes)?;

    println!(
        "Wrote {} ({} samples at {} Hz, {} channel(s) downmixed)",
        output.display(),
        clip.samples.len(),
        clip.sample_rate,
        clip.channels
    );
    Ok(())
}
