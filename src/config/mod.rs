//! Configuration management for audiogram.
//!
//! Loads analysis, display and per-plot styling settings from a TOML file in
//! the user's config directory. Command-line flags override these values.

pub mod file;

pub use file::{get_config_path, AnalysisConfig, AudiogramConfig, DisplayConfig};
