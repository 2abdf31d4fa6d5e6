//! Playback through the system audio player.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Players tried in order, with the flags that keep them quiet and headless.
#[cfg(target_os = "macos")]
const PLAYERS: &[(&str, &[&str])] = &[("afplay", &[])];

#[cfg(not(target_os = "macos"))]
const PLAYERS: &[(&str, &[&str])] = &[
    ("paplay", &[]),
    ("aplay", &["-q"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("mpv", &["--no-video", "--really-quiet"]),
];

/// A running player process, stopped when dropped.
#[derive(Debug)]
pub struct Player {
    child: Option<Child>,
}

impl Player {
    fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    /// Stops the player if it is still running and reaps it.
    ///
    /// Returns the exit status the first time, `None` afterwards.
    pub fn stop(&mut self) -> Option<ExitStatus> {
        let mut child = self.child.take()?;
        match child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!("Player already exited: {status}");
                return Some(status);
            }
            Ok(None) => {
                if let Err(e) = child.kill() {
                    tracing::warn!("Failed to stop audio player: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to query audio player: {e}"),
        }
        child.wait().ok()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Starts playing `path` in the background.
///
/// Output is discarded so the player cannot draw over the terminal UI. The
/// player stops when the returned handle is dropped.
///
/// # Errors
/// - If none of the known players can be started
pub fn spawn_player(path: &Path) -> anyhow::Result<Player> {
    for (player, args) in PLAYERS {
        match Command::new(player)
            .args(*args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                tracing::info!("Playing {} with {}", path.display(), player);
                return Ok(Player::new(child));
            }
            Err(e) => tracing::debug!("Player {} unavailable: {}", player, e),
        }
    }

    let names: Vec<&str> = PLAYERS.iter().map(|(name, _)| *name).collect();
    Err(anyhow::anyhow!(
        "No audio player found. Install one of: {}",
        names.join(", ")
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sleeper() -> Player {
        Player::new(Command::new("sleep").arg("30").spawn().unwrap())
    }

    #[test]
    fn test_stop_kills_running_player() {
        let mut player = sleeper();
        let status = player.stop().unwrap();
        assert!(!status.success());
        assert!(player.stop().is_none());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_drop_stops_player() {
        let player = sleeper();
        let proc_dir = std::path::PathBuf::from(format!("/proc/{}", player.child.as_ref().unwrap().id()));
        assert!(proc_dir.exists());
        drop(player);

        // Killed and reaped, so the process entry is gone.
        assert!(!proc_dir.exists());
    }
}
