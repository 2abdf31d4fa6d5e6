//! Terminal user interface.

pub mod viewer;

pub use viewer::{ViewerCommand, WaveformViewer};
