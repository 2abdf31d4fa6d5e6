//! Terminal waveform viewer with a real-time playback cursor.

use crate::audio_file::{write_bytes, AudioClip};
use crate::commands::player::spawn_player;
use crate::config::AudiogramConfig;
use crate::ui::{ViewerCommand, WaveformViewer};
use audiogram::pcm::encode_pcm16;
use std::path::PathBuf;

/// Shows the waveform of `file` with a cursor that follows wall-clock time.
///
/// Space freezes the cursor, Escape or 'q' quits. With `play`, the file is
/// re-encoded as 16-bit PCM into the temp directory and handed to the system
/// player; the player is stopped when the viewer closes.
///
/// # Errors
/// - If the file cannot be decoded
/// - If playback is requested but no player can be started
/// - If the terminal cannot be driven
pub async fn handle_view(file: PathBuf, play: bool) -> anyhow::Result<()> {
    tracing::info!("=== audiogram View Command ===");

    let config = AudiogramConfig::load()?;
    let clip = AudioClip::load(&file)?;
    let duration = clip.duration_secs();
    let title = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    // The viewer comes first so a terminal that cannot enter raw mode never
    // starts playback.
    let mut viewer = WaveformViewer::new(&config.waveform, &config.marker)?;

    let mut player = if play {
        let playback_path = std::env::temp_dir().join("audiogram-playback.wav");
        write_bytes(&playback_path, &encode_pcm16(&clip.samples, clip.sample_rate)?)?;
        let player = spawn_player(&playback_path)?;
        viewer.restart_clock();
        Some(player)
    } else {
        None
    };
    tracing::debug!("Entering view loop. Press Space to pause, Escape/'q' to quit.");

    let result = loop {
        match viewer.handle_input() {
            Ok(ViewerCommand::Quit) => break Ok(()),
            Ok(ViewerCommand::Continue | ViewerCommand::TogglePause) => {}
            Err(e) => break Err(e),
        }
        let position = viewer.position_secs().min(duration);
        if let Err(e) = viewer.render(&clip.samples, position, duration, &title) {
            break Err(e);
        }
    };

    if let Some(player) = player.as_mut() {
        player.stop();
    }
    viewer.cleanup()?;
    if let Err(e) = &result {
        tracing::error!("Viewer error: {e}");
    }
    tracing::info!("Viewer closed");
    result
}
