//! Catalog builders for the two generation modes

/// Overlapping model: patterns extracted from a sample image
pub mod overlapping;
/// Palette extraction from RGBA samples
pub mod sample;
/// Simple tiled model: explicit tiles and adjacency rules
pub mod tiled;
