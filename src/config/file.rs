//! Configuration file management for audiogram.
//!
//! Settings live in `~/.config/audiogram/audiogram.toml`. Every section and
//! every field is optional: a missing file, section or key falls back to the
//! built-in default, so a config only needs the values it changes.

use audiogram::dsp::{AnalysisOptions, ScaleMode, SpectrogramSettings, TransformKind, WindowFunction};
use audiogram::render::{FrequencyGraphOptions, MarkerOptions, SpectrogramOptions, WaveformOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Analysis parameters shared by the spectrum and spectrogram commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Spectrogram frame length in samples
    pub window_size: usize,
    /// Samples between spectrogram frames
    pub hop_size: usize,
    /// Spectrum transform length; unset uses the next power of two
    pub analysis_size: Option<usize>,
    /// Frame taper: "rectangular", "hann" or "hamming"
    pub window: WindowFunction,
    /// "direct" (reference) or "fast" (rustfft)
    pub transform: TransformKind,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let settings = SpectrogramSettings::default();
        Self {
            window_size: settings.window_size,
            hop_size: settings.hop_size,
            analysis_size: None,
            window: settings.window,
            transform: settings.transform,
        }
    }
}

impl AnalysisConfig {
    pub fn spectrogram_settings(&self) -> SpectrogramSettings {
        SpectrogramSettings {
            window_size: self.window_size,
            hop_size: self.hop_size,
            window: self.window,
            transform: self.transform,
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            analysis_size: self.analysis_size,
            transform: self.transform,
        }
    }
}

/// Output image geometry and frequency axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// "linear" or "perceptual" (Mel)
    pub scale: ScaleMode,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: ScaleMode::default(),
            width: 1200,
            height: 400,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudiogramConfig {
    pub analysis: AnalysisConfig,
    pub display: DisplayConfig,
    pub frequency_graph: FrequencyGraphOptions,
    pub spectrogram: SpectrogramOptions,
    pub waveform: WaveformOptions,
    pub marker: MarkerOptions,
}

impl AudiogramConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - If the file exists but cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed or a value has the wrong type
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let config: AudiogramConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        tracing::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    /// - If the directory cannot be created or the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Path of the config file, `~/.config/audiogram/audiogram.toml`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("audiogram").join("audiogram.toml"))
}
