use crate::algorithm::catalog::Catalog;
use crate::algorithm::wave::Wave;
use crate::io::configuration::ENTROPY_NOISE;
use crate::math::probability::weighted_index;
use crate::math::random::RandomSource;
use crate::spatial::Grid;

/// Outcome of scanning the wave for the next cell to collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellChoice {
    /// Some cell has no possible pattern left
    Contradiction,
    /// Every cell is down to a single pattern
    Resolved,
    /// Collapse this cell next
    Collapse(usize),
}

/// Find the undecided cell of lowest entropy
///
/// Boundary cells are skipped. Ties are broken by adding `ENTROPY_NOISE · rng()` to each
/// candidate whose entropy does not exceed the running minimum, so the random source is
/// only consulted for plausible candidates.
pub fn lowest_entropy_cell<C, R>(wave: &Wave, catalog: &C, grid: &Grid, rng: &mut R) -> CellChoice
where
    C: Catalog + ?Sized,
    R: RandomSource + ?Sized,
{
    let mut min = f64::INFINITY;
    let mut argmin = None;

    for cell in 0..grid.len() {
        let (x, y) = grid.coordinates(cell);
        if catalog.on_boundary(grid, x as isize, y as isize) {
            continue;
        }

        let amount = wave.remaining(cell);
        if amount == 0 {
            return CellChoice::Contradiction;
        }

        let entropy = wave.entropy(cell);
        if amount > 1 && entropy <= min {
            let noisy = ENTROPY_NOISE.mul_add(rng.next_f64(), entropy);
            if noisy < min {
                min = noisy;
                argmin = Some(cell);
            }
        }
    }

    argmin.map_or(CellChoice::Resolved, CellChoice::Collapse)
}

/// Collapse `cell` to one of its possible patterns, drawn by weight with a single sample
///
/// Every other possible pattern is banned. Returns the chosen pattern.
pub fn collapse_cell<R: RandomSource + ?Sized>(wave: &mut Wave, cell: usize, rng: &mut R) -> usize {
    let distribution: Vec<f64> = wave
        .weights()
        .iter()
        .enumerate()
        .map(|(t, &weight)| if wave.is_possible(cell, t) { weight } else { 0.0 })
        .collect();

    let chosen = weighted_index(&distribution, rng.next_f64());

    for t in 0..wave.pattern_count() {
        if t != chosen && wave.is_possible(cell, t) {
            wave.ban(cell, t);
        }
    }

    chosen
}

/// First possible pattern of every cell, the assignment encoded by a resolved wave
pub fn resolved_assignment(wave: &Wave) -> Vec<usize> {
    (0..wave.cells())
        .map(|cell| wave.possible_patterns(cell).next().unwrap_or(0))
        .collect()
}
