//! Tests for minimum-entropy cell selection and weighted collapse

#[cfg(test)]
mod tests {
    use wavecollapse::algorithm::catalog::{Catalog, Propagator};
    use wavecollapse::algorithm::selection::{
        CellChoice, collapse_cell, lowest_entropy_cell, resolved_assignment,
    };
    use wavecollapse::algorithm::wave::Wave;
    use wavecollapse::math::random::FnRandom;
    use wavecollapse::spatial::Grid;

    struct Free {
        weights: Vec<f64>,
        propagator: Propagator,
        // Columns below this x are excluded from observation
        margin: isize,
    }

    impl Free {
        fn new(weights: Vec<f64>) -> Self {
            let count = weights.len();
            Self {
                weights,
                propagator: Propagator::from_fn(count, |_, _, _| true),
                margin: 0,
            }
        }
    }

    impl Catalog for Free {
        fn weights(&self) -> &[f64] {
            &self.weights
        }

        fn propagator(&self) -> &Propagator {
            &self.propagator
        }

        fn on_boundary(&self, grid: &Grid, x: isize, y: isize) -> bool {
            x < self.margin || (!grid.periodic() && !grid.contains(x, y))
        }
    }

    fn cleared(catalog: &Free, cells: usize) -> wavecollapse::Result<Wave> {
        let mut wave = Wave::new(catalog.weights(), cells)?;
        wave.clear(catalog.propagator());
        Ok(wave)
    }

    fn sequence(values: Vec<f64>) -> FnRandom<impl FnMut() -> f64> {
        let mut values = values.into_iter();
        FnRandom(move || values.next().unwrap_or(0.5))
    }

    // Tests that noise only breaks ties and never overrides a lower entropy
    // Verified by adding noise scaled by 1 instead of ENTROPY_NOISE
    #[test]
    fn test_lowest_entropy_wins() -> wavecollapse::Result<()> {
        let catalog = Free::new(vec![1.0, 1.0, 1.0]);
        let grid = Grid::new(3, 1, false)?;
        let mut wave = cleared(&catalog, grid.len())?;
        wave.ban(2, 0);

        let choice = lowest_entropy_cell(&wave, &catalog, &grid, &mut sequence(vec![0.0, 0.0, 0.99]));

        assert_eq!(choice, CellChoice::Collapse(2));
        Ok(())
    }

    // Tests tie breaking among equal entropies by the noise draws
    // Verified by using <= instead of < when comparing noisy entropies
    #[test]
    fn test_ties_broken_by_noise() -> wavecollapse::Result<()> {
        let catalog = Free::new(vec![1.0, 1.0]);
        let grid = Grid::new(3, 1, false)?;
        let wave = cleared(&catalog, grid.len())?;

        let choice = lowest_entropy_cell(&wave, &catalog, &grid, &mut sequence(vec![0.9, 0.1, 0.5]));
        assert_eq!(choice, CellChoice::Collapse(1));

        let constant = lowest_entropy_cell(&wave, &catalog, &grid, &mut FnRandom(|| 0.5));
        assert_eq!(constant, CellChoice::Collapse(0));
        Ok(())
    }

    // Tests that only candidates consume random draws
    // Verified by drawing noise for decided cells as well
    #[test]
    fn test_decided_cells_draw_no_noise() -> wavecollapse::Result<()> {
        let catalog = Free::new(vec![1.0, 1.0]);
        let grid = Grid::new(3, 1, false)?;
        let mut wave = cleared(&catalog, grid.len())?;
        wave.ban(0, 1);

        let mut draws = 0;
        let choice = lowest_entropy_cell(&wave, &catalog, &grid, &mut FnRandom(|| {
            draws += 1;
            0.5
        }));

        assert_eq!(choice, CellChoice::Collapse(1));
        assert_eq!(draws, 2);
        Ok(())
    }

    // Tests the resolved and contradiction outcomes
    // Verified by reporting contradictions only after the full scan
    #[test]
    fn test_resolved_and_contradiction() -> wavecollapse::Result<()> {
        let catalog = Free::new(vec![1.0, 1.0]);
        let grid = Grid::new(2, 1, false)?;
        let mut wave = cleared(&catalog, grid.len())?;
        wave.ban(0, 0);
        wave.ban(1, 1);

        let mut rng = FnRandom(|| 0.5);
        assert_eq!(lowest_entropy_cell(&wave, &catalog, &grid, &mut rng), CellChoice::Resolved);
        assert_eq!(resolved_assignment(&wave), vec![1, 0]);

        wave.ban(1, 0);
        assert_eq!(
            lowest_entropy_cell(&wave, &catalog, &grid, &mut rng),
            CellChoice::Contradiction
        );
        Ok(())
    }

    // Tests that boundary cells are never observed, even when empty
    // Verified by removing the boundary check from the scan
    #[test]
    fn test_boundary_cells_skipped() -> wavecollapse::Result<()> {
        let mut catalog = Free::new(vec![1.0, 1.0]);
        catalog.margin = 1;
        let grid = Grid::new(2, 1, false)?;
        let mut wave = cleared(&catalog, grid.len())?;
        wave.ban(0, 0);
        wave.ban(0, 1);

        let choice = lowest_entropy_cell(&wave, &catalog, &grid, &mut FnRandom(|| 0.5));

        assert_eq!(choice, CellChoice::Collapse(1));
        Ok(())
    }

    // Tests weighted collapse with a single draw
    // Verified by ignoring weights when building the distribution
    #[test]
    fn test_collapse_cell_weighted() -> wavecollapse::Result<()> {
        let catalog = Free::new(vec![1.0, 3.0]);
        let mut wave = cleared(&catalog, 2)?;

        assert_eq!(collapse_cell(&mut wave, 0, &mut FnRandom(|| 0.2)), 0);
        assert_eq!(collapse_cell(&mut wave, 1, &mut FnRandom(|| 0.3)), 1);

        assert_eq!(wave.possible_patterns(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(wave.possible_patterns(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(wave.pending(), 2);
        Ok(())
    }

    // Tests that banned patterns are never chosen
    // Verified by giving banned patterns their full weight
    #[test]
    fn test_collapse_cell_respects_bans() -> wavecollapse::Result<()> {
        let catalog = Free::new(vec![5.0, 1.0, 5.0]);
        let mut wave = cleared(&catalog, 1)?;
        wave.ban(0, 0);
        wave.ban(0, 2);

        assert_eq!(collapse_cell(&mut wave, 0, &mut FnRandom(|| 0.0)), 1);
        assert_eq!(wave.remaining(0), 1);
        Ok(())
    }
}
