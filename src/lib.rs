//! Wave function collapse synthesis of textures and tile maps
//!
//! A catalog of patterns (extracted from a sample image, or expanded from a symmetric
//! tileset) is fed to a constraint-propagation engine which collapses an output grid
//! cell by cell, always picking the cell of lowest entropy, until every cell holds a
//! single pattern or a contradiction is reached.

#![deny(unsafe_code)]

/// Propagation engine: wave state, propagation, observation and the generation driver
pub mod algorithm;
/// Catalog builders turning samples and tilesets into patterns, weights and propagators
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Weighted selection, entropy and random sources
pub mod math;
/// Grid geometry, pattern transforms and tile symmetry classes
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
