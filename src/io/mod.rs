//! Input/output operations, configuration and error handling

/// Command-line interface and batch processing
pub mod cli;
/// Algorithm constants and runtime defaults
pub mod configuration;
/// Tileset definition files
pub mod definition;
/// Error types
pub mod error;
/// PNG import and export
pub mod image;
/// Progress display
pub mod progress;
/// RGBA projection of a generation
pub mod render;
/// Frame capture and GIF generation
pub mod visualization;
