//! Spatial data structures and transforms
//!
//! This module contains spatial-related functionality including:
//! - Output grid geometry and neighbourhood directions
//! - N×N pattern extraction, rotation and reflection
//! - Tile symmetry classes and their orientation action tables

/// Output grid geometry
pub mod grid;
/// Square pattern values and their transforms
pub mod pattern;
/// Tile symmetry classes
pub mod symmetry;

pub use grid::{Direction, Grid};
