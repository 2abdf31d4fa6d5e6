//! Application orchestration and command routing.
//!
//! Parses the command line and delegates to the command handlers.

use crate::commands::{self, ImageSize};
use crate::logging;
use audiogram::dsp::{Band, EqualizerMode, ScaleMode, WindowFunction};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Spectrum, spectrogram and waveform rendering for WAV files
#[derive(Parser)]
#[command(name = "audiogram")]
#[command(version)]
#[command(about = "Render spectra, spectrograms and waveforms of WAV files")]
#[command(long_about = "Render spectra, spectrograms and waveforms of WAV files.\n\nAnalysis and styling defaults come from the config file; flags override them.\n\nEXAMPLES:\n    # Magnitude spectrum on a Mel axis\n    $ audiogram spectrum voice.wav -o spectrum.png --scale perceptual\n    \n    # Spectrogram with a Hann window\n    $ audiogram spectrogram voice.wav -o spec.png --window 2048 --hop 512 --window-fn hann\n    \n    # Waveform with a marker at 1.5 seconds\n    $ audiogram waveform voice.wav -o wave.png --position 1.5\n    \n    # Boost the bass, cut the treble, and render before/after spectrograms\n    $ audiogram equalize song.wav -o eq.wav --band 20:250:2.0 --band 4000:20000:0.5 --render out/\n    \n    # Watch the waveform while it plays\n    $ audiogram view song.wav --play")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/audiogram/audiogram.toml\n    Logs:               ~/.local/state/audiogram/audiogram.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot the magnitude spectrum of a file
    #[command(visible_alias = "s")]
    Spectrum {
        /// WAV file to analyse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// PNG file to write
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,

        /// Frequency axis: linear or perceptual (Mel)
        #[arg(long, value_name = "SCALE")]
        scale: Option<ScaleMode>,

        /// Transform length (defaults to the next power of two)
        #[arg(long, value_name = "N")]
        analysis_size: Option<usize>,

        #[command(flatten)]
        size: ImageSize,

        /// Use the fast transform
        #[arg(long)]
        fast: bool,
    },

    /// Render a spectrogram heat map of a file
    #[command(visible_alias = "sg")]
    Spectrogram {
        /// WAV file to analyse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// PNG file to write
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,

        /// Samples per frame
        #[arg(long, value_name = "SAMPLES")]
        window: Option<usize>,

        /// Samples between frames
        #[arg(long, value_name = "SAMPLES")]
        hop: Option<usize>,

        /// Frame taper: rectangular, hann or hamming
        #[arg(long, value_name = "WINDOW")]
        window_fn: Option<WindowFunction>,

        #[command(flatten)]
        size: ImageSize,

        /// Use the fast transform
        #[arg(long)]
        fast: bool,
    },

    /// Plot the waveform of a file
    #[command(visible_alias = "w")]
    Waveform {
        /// WAV file to plot
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// PNG file to write
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,

        /// Draw a playback marker at this time in seconds
        #[arg(long, value_name = "SECONDS")]
        position: Option<f64>,

        #[command(flatten)]
        size: ImageSize,
    },

    /// Re-encode a file as mono 16-bit PCM WAV
    Encode {
        /// WAV file to read
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// WAV file to write
        #[arg(short, long, value_name = "WAV")]
        output: PathBuf,
    },

    /// Apply a band equalizer and write the result
    ///
    /// Bands are START:END:GAIN with frequencies in Hz and a linear gain.
    /// Explicit bands replace the preset selected with --mode.
    #[command(visible_alias = "eq")]
    Equalize {
        /// WAV file to process
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// WAV file to write
        #[arg(short, long, value_name = "WAV")]
        output: PathBuf,

        /// Preset band layout: generic or musical
        #[arg(long, value_name = "MODE")]
        mode: Option<EqualizerMode>,

        /// Band as START:END:GAIN (repeatable)
        #[arg(long = "band", value_name = "START:END:GAIN")]
        bands: Vec<Band>,

        /// Write input.png and output.png spectrograms into this directory
        #[arg(long, value_name = "DIR")]
        render: Option<PathBuf>,

        /// Use the fast transform
        #[arg(long)]
        fast: bool,
    },

    /// Show the waveform in the terminal with a live playback cursor
    ///
    /// Space pauses the cursor, Escape/q quits.
    #[command(visible_alias = "v")]
    View {
        /// WAV file to show
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Play the file through the system audio player
        #[arg(long)]
        play: bool,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   audiogram completions bash > audiogram.bash
    ///   audiogram completions zsh > _audiogram
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the command fails (decode, analysis, file output, terminal)
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that need neither logging nor config
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "audiogram", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;
    tracing::debug!("audiogram {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Spectrum {
            file,
            output,
            scale,
            analysis_size,
            size,
            fast,
        } => commands::handle_spectrum(file, output, scale, analysis_size, size, fast).await,
        Commands::Spectrogram {
            file,
            output,
            window,
            hop,
            window_fn,
            size,
            fast,
        } => {
            commands::handle_spectrogram(file, output, window, hop, window_fn, size, fast).await
        }
        Commands::Waveform {
            file,
            output,
            position,
            size,
        } => commands::handle_waveform(file, output, position, size).await,
        Commands::Encode { file, output } => commands::handle_encode(file, output).await,
        Commands::Equalize {
            file,
            output,
            mode,
            bands,
            render,
            fast,
        } => commands::handle_equalize(file, output, mode, bands, render, fast).await,
        Commands::View { file, play } => commands::handle_view(file, play).await,
        Commands::Config => commands::handle_config(),
        Commands::Completions { .. } | Commands::Logs => {
            unreachable!("These commands are handled earlier")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_equalize_bands_parse() {
        let cli = Cli::try_parse_from([
            "audiogram",
            "equalize",
            "in.wav",
            "-o",
            "out.wav",
            "--band",
            "20:250:2",
            "--band",
            "4000:8000:0.5",
        ])
        .unwrap();
        let Commands::Equalize { bands, mode, .. } = cli.command else {
            panic!("expected equalize");
        };
        assert_eq!(mode, None);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].gain, 2.0);
        assert_eq!(bands[1].end_hz, 8000.0);
    }

    #[test]
    fn test_spectrum_flags() {
        let cli = Cli::try_parse_from([
            "audiogram",
            "spectrum",
            "in.wav",
            "-o",
            "out.png",
            "--scale",
            "mel",
            "--width",
            "640",
            "--fast",
        ])
        .unwrap();
        let Commands::Spectrum {
            scale, size, fast, ..
        } = cli.command
        else {
            panic!("expected spectrum");
        };
        assert_eq!(scale, Some(ScaleMode::Perceptual));
        assert_eq!(size.width, Some(640));
        assert_eq!(size.height, None);
        assert!(fast);
    }

    #[test]
    fn test_bad_band_is_rejected() {
        let result = Cli::try_parse_from([
            "audiogram", "equalize", "in.wav", "-o", "out.wav", "--band", "20-250",
        ]);
        assert!(result.is_err());
    }
}
