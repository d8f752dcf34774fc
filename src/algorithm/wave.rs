//! Per-run generation state
//!
//! Everything a generation attempt mutates lives here: which patterns remain possible
//! in each cell, how much neighbour support each of them still has, the incremental
//! entropy accumulators and the stack of bans awaiting propagation. A new attempt
//! calls [`Wave::clear`] and starts over.

use crate::algorithm::catalog::Propagator;
use crate::io::error::{Result, invalid_catalog};
use crate::math::probability::{entropy_from_sums, weight_log_weight};
use crate::spatial::Direction;
use bitvec::prelude::*;
use ndarray::{Array3, s};

/// Possibility state of every cell of a generation
#[derive(Debug, Clone)]
pub struct Wave {
    cells: usize,
    pattern_count: usize,
    /// `possible[cell * pattern_count + pattern]`, only ever cleared within a run
    possible: BitVec,
    /// Remaining supporters of `[cell, pattern]` from the neighbour opposite `direction`
    compatible: Array3<i32>,
    weights: Vec<f64>,
    weight_log_weights: Vec<f64>,
    sum_of_weights: f64,
    sum_of_weight_log_weights: f64,
    starting_entropy: f64,
    sums_of_ones: Vec<usize>,
    sums_of_weights: Vec<f64>,
    sums_of_weight_log_weights: Vec<f64>,
    entropies: Vec<f64>,
    stack: Vec<(usize, usize)>,
}

impl Wave {
    /// Allocate the state for `cells` cells over patterns with the given weights
    ///
    /// The wave starts with every pattern banned; call [`Wave::clear`] before use.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no weights or any weight is not a positive finite number
    pub fn new(weights: &[f64], cells: usize) -> Result<Self> {
        if weights.is_empty() {
            return Err(invalid_catalog(&"catalog contains no patterns"));
        }
        if let Some(&w) = weights.iter().find(|&&w| !(w.is_finite() && w > 0.0)) {
            return Err(invalid_catalog(&format!(
                "weight {w} is not positive, entropy is undefined"
            )));
        }

        let pattern_count = weights.len();
        let weight_log_weights: Vec<f64> = weights.iter().map(|&w| weight_log_weight(w)).collect();
        let sum_of_weights: f64 = weights.iter().sum();
        let sum_of_weight_log_weights: f64 = weight_log_weights.iter().sum();
        let starting_entropy = entropy_from_sums(sum_of_weights, sum_of_weight_log_weights);

        Ok(Self {
            cells,
            pattern_count,
            possible: bitvec![0; cells * pattern_count],
            compatible: Array3::zeros((cells, pattern_count, 4)),
            weights: weights.to_vec(),
            weight_log_weights,
            sum_of_weights,
            sum_of_weight_log_weights,
            starting_entropy,
            sums_of_ones: vec![0; cells],
            sums_of_weights: vec![0.0; cells],
            sums_of_weight_log_weights: vec![0.0; cells],
            entropies: vec![0.0; cells],
            stack: Vec::with_capacity(cells * pattern_count),
        })
    }

    /// Reset every cell to full superposition
    ///
    /// Each pattern starts with as much support in direction `d` as there are patterns
    /// allowed next to it from the opposite side.
    pub fn clear(&mut self, propagator: &Propagator) {
        self.possible.fill(true);

        for t in 0..self.pattern_count {
            for direction in Direction::ALL {
                let support = propagator.compatible(direction.opposite(), t).len() as i32;
                self.compatible
                    .slice_mut(s![.., t, direction.index()])
                    .fill(support);
            }
        }

        self.sums_of_ones.fill(self.pattern_count);
        self.sums_of_weights.fill(self.sum_of_weights);
        self.sums_of_weight_log_weights
            .fill(self.sum_of_weight_log_weights);
        self.entropies.fill(self.starting_entropy);
        self.stack.clear();
    }

    /// Remove `pattern` from `cell` and queue the ban for propagation
    ///
    /// Banning an already banned pattern, or one outside the wave, does nothing.
    pub fn ban(&mut self, cell: usize, pattern: usize) {
        if !self.is_possible(cell, pattern) {
            return;
        }
        self.possible.set(cell * self.pattern_count + pattern, false);

        for direction in Direction::ALL {
            if let Some(support) = self.compatible.get_mut([cell, pattern, direction.index()]) {
                *support = 0;
            }
        }
        self.stack.push((cell, pattern));

        let weight = self.weights.get(pattern).copied().unwrap_or(0.0);
        let weight_log_weight = self.weight_log_weights.get(pattern).copied().unwrap_or(0.0);
        if let (Some(ones), Some(sum), Some(log_sum), Some(entropy)) = (
            self.sums_of_ones.get_mut(cell),
            self.sums_of_weights.get_mut(cell),
            self.sums_of_weight_log_weights.get_mut(cell),
            self.entropies.get_mut(cell),
        ) {
            *ones = ones.saturating_sub(1);
            *sum -= weight;
            *log_sum -= weight_log_weight;

            // An emptied cell is a contradiction, reported by the next observation
            *entropy = if *ones == 0 {
                0.0
            } else {
                entropy_from_sums(*sum, *log_sum)
            };
        }
    }

    /// Take the most recent pending ban
    pub(crate) fn pop_ban(&mut self) -> Option<(usize, usize)> {
        self.stack.pop()
    }

    /// Remove one supporter of `pattern` at `cell` in `direction`
    ///
    /// Returns `true` when the last supporter is gone and the pattern must be banned.
    pub(crate) fn weaken(&mut self, cell: usize, pattern: usize, direction: Direction) -> bool {
        self.compatible
            .get_mut([cell, pattern, direction.index()])
            .is_some_and(|support| {
                *support -= 1;
                *support == 0
            })
    }

    /// Whether `pattern` is still possible at `cell`
    pub fn is_possible(&self, cell: usize, pattern: usize) -> bool {
        pattern < self.pattern_count
            && self
                .possible
                .get(cell * self.pattern_count + pattern)
                .is_some_and(|b| *b)
    }

    /// Patterns still possible at `cell`, in ascending order
    pub fn possible_patterns(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let start = cell * self.pattern_count;
        self.possible
            .get(start..start + self.pattern_count)
            .into_iter()
            .flat_map(BitSlice::iter_ones)
    }

    /// Remaining supporters of `pattern` at `cell` for `direction`
    pub fn support(&self, cell: usize, pattern: usize, direction: Direction) -> i32 {
        self.compatible
            .get([cell, pattern, direction.index()])
            .copied()
            .unwrap_or(0)
    }

    /// Number of patterns still possible at `cell`
    pub fn remaining(&self, cell: usize) -> usize {
        self.sums_of_ones.get(cell).copied().unwrap_or(0)
    }

    /// Sum of the weights of the patterns still possible at `cell`
    pub fn sum_of_weights(&self, cell: usize) -> f64 {
        self.sums_of_weights.get(cell).copied().unwrap_or(0.0)
    }

    /// Sum of `w·ln(w)` over the patterns still possible at `cell`
    pub fn sum_of_weight_log_weights(&self, cell: usize) -> f64 {
        self.sums_of_weight_log_weights
            .get(cell)
            .copied()
            .unwrap_or(0.0)
    }

    /// Shannon entropy of the weighted patterns still possible at `cell`
    pub fn entropy(&self, cell: usize) -> f64 {
        self.entropies.get(cell).copied().unwrap_or(0.0)
    }

    /// Entropy of a cell in full superposition
    pub const fn starting_entropy(&self) -> f64 {
        self.starting_entropy
    }

    /// Pattern weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of cells
    pub const fn cells(&self) -> usize {
        self.cells
    }

    /// Number of patterns
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of bans awaiting propagation
    pub fn pending(&self) -> usize {
        self.stack.len()
    }
}
