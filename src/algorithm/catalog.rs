//! The catalog interface consumed by the propagation engine
//!
//! Both generation modes reduce to the same inputs: a pattern count, one weight per
//! pattern, a directional compatibility table and a boundary predicate. The engine is
//! generic over this trait and never learns how the catalog was produced.

use crate::algorithm::wave::Wave;
use crate::io::error::{Result, invalid_catalog};
use crate::spatial::{Direction, Grid};

/// Directional compatibility table
///
/// `compatible(d, t)` lists, in ascending order, every pattern allowed in the cell one
/// step from a `t` cell in direction `d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagator {
    lists: [Vec<Vec<usize>>; 4],
}

impl Propagator {
    /// Build a propagator from one `pattern_count`×`pattern_count` predicate per direction
    pub fn from_fn(
        pattern_count: usize,
        mut allowed: impl FnMut(Direction, usize, usize) -> bool,
    ) -> Self {
        let lists = Direction::ALL.map(|direction| {
            (0..pattern_count)
                .map(|t1| {
                    (0..pattern_count)
                        .filter(|&t2| allowed(direction, t1, t2))
                        .collect()
                })
                .collect()
        });
        Self { lists }
    }

    /// Wrap explicit lists, indexed `[direction][pattern]`
    ///
    /// # Errors
    ///
    /// Returns an error if the four directions disagree on the pattern count or a list
    /// refers to a pattern outside the catalog
    pub fn from_lists(lists: [Vec<Vec<usize>>; 4]) -> Result<Self> {
        let [west, ..] = &lists;
        let pattern_count = west.len();
        for (d, per_pattern) in lists.iter().enumerate() {
            if per_pattern.len() != pattern_count {
                return Err(invalid_catalog(&format!(
                    "direction {d} has {} entries, expected {pattern_count}",
                    per_pattern.len()
                )));
            }
            if let Some(bad) = per_pattern
                .iter()
                .flatten()
                .find(|&&t| t >= pattern_count)
            {
                return Err(invalid_catalog(&format!(
                    "direction {d} refers to pattern {bad} of {pattern_count}"
                )));
            }
        }
        Ok(Self { lists })
    }

    /// Number of patterns covered
    pub fn pattern_count(&self) -> usize {
        let [west, ..] = &self.lists;
        west.len()
    }

    /// Patterns allowed next to `pattern` in `direction`
    pub fn compatible(&self, direction: Direction, pattern: usize) -> &[usize] {
        self.lists
            .get(direction.index())
            .and_then(|per_pattern| per_pattern.get(pattern))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Inputs every generation mode provides to the engine
pub trait Catalog {
    /// Relative frequency of each pattern, all strictly positive
    fn weights(&self) -> &[f64];

    /// Directional compatibility table
    fn propagator(&self) -> &Propagator;

    /// Number of patterns
    fn pattern_count(&self) -> usize {
        self.weights().len()
    }

    /// Whether `(x, y)` is excluded from observation and propagation
    fn on_boundary(&self, grid: &Grid, x: isize, y: isize) -> bool;

    /// Reject output grids this catalog cannot fill
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is too small for the catalog's patterns
    fn check_grid(&self, _grid: &Grid) -> Result<()> {
        Ok(())
    }

    /// Apply catalog-specific bans to a freshly cleared wave
    ///
    /// The engine propagates afterwards.
    fn seed(&self, _grid: &Grid, _wave: &mut Wave) {}
}

/// Check that weights and propagator describe a usable catalog
///
/// # Errors
///
/// Returns an error if the catalog is empty, a weight is not a positive finite number,
/// or the propagator covers a different number of patterns
pub fn validate<C: Catalog + ?Sized>(catalog: &C) -> Result<()> {
    let weights = catalog.weights();
    if weights.is_empty() {
        return Err(invalid_catalog(&"catalog contains no patterns"));
    }
    if let Some((t, w)) = weights
        .iter()
        .enumerate()
        .find(|&(_, &w)| !(w.is_finite() && w > 0.0))
    {
        return Err(invalid_catalog(&format!(
            "pattern {t} has weight {w}, weights must be positive"
        )));
    }
    let propagated = catalog.propagator().pattern_count();
    if propagated != weights.len() {
        return Err(invalid_catalog(&format!(
            "propagator covers {propagated} patterns but {} weights were given",
            weights.len()
        )));
    }
    Ok(())
}
