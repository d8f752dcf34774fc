use crate::algorithm::catalog::Catalog;
use crate::algorithm::wave::Wave;
use crate::spatial::{Direction, Grid};

/// Drain the ban stack until the wave is arc consistent
///
/// Every ban withdraws support from the neighbouring cells: for each pattern the banned
/// one allowed in a direction, the neighbour's counter for that direction is decremented,
/// and a counter reaching zero bans that pattern in turn. Each `(cell, pattern)` pair is
/// banned at most once, which bounds the total work.
pub fn propagate<C: Catalog + ?Sized>(wave: &mut Wave, catalog: &C, grid: &Grid) {
    let propagator = catalog.propagator();

    while let Some((cell, pattern)) = wave.pop_ban() {
        for direction in Direction::ALL {
            let (x, y) = grid.step(cell, direction);
            if catalog.on_boundary(grid, x, y) {
                continue;
            }
            let neighbor = grid.wrap(x, y);

            for &supported in propagator.compatible(direction, pattern) {
                if wave.weaken(neighbor, supported, direction) {
                    wave.ban(neighbor, supported);
                }
            }
        }
    }
}

/// Count `(cell, pattern, direction)` triples where a possible pattern has no possible
/// supporter left in the neighbouring cell
///
/// Zero after [`propagate`] returns; useful for diagnosing custom catalogs.
pub fn unsupported_count<C: Catalog + ?Sized>(wave: &Wave, catalog: &C, grid: &Grid) -> usize {
    let propagator = catalog.propagator();
    let mut unsupported = 0;

    for cell in 0..grid.len() {
        let (cx, cy) = grid.coordinates(cell);
        if catalog.on_boundary(grid, cx as isize, cy as isize) {
            continue;
        }
        for pattern in wave.possible_patterns(cell) {
            for direction in Direction::ALL {
                let (x, y) = grid.step(cell, direction);
                if catalog.on_boundary(grid, x, y) {
                    continue;
                }
                let allowed = propagator.compatible(direction, pattern);
                // Patterns nobody may neighbour are never banned by propagation
                if allowed.is_empty() {
                    continue;
                }
                let neighbor = grid.wrap(x, y);
                if !allowed.iter().any(|&t| wave.is_possible(neighbor, t)) {
                    unsupported += 1;
                }
            }
        }
    }

    unsupported
}
