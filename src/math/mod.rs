//! Mathematical utilities for the algorithm

/// Weighted selection and entropy bookkeeping
pub mod probability;
/// Injectable random sources
pub mod random;
