//! Tests for per-run wave state and its incremental aggregates

#[cfg(test)]
mod tests {
    use wavecollapse::AlgorithmError;
    use wavecollapse::algorithm::catalog::Propagator;
    use wavecollapse::algorithm::wave::Wave;
    use wavecollapse::spatial::Direction;

    fn differ() -> Propagator {
        Propagator::from_fn(2, |_, t1, t2| t1 != t2)
    }

    // Tests that empty or non-positive weights are rejected
    // Verified by removing the weight check from Wave::new
    #[test]
    fn test_new_rejects_bad_weights() {
        assert!(matches!(Wave::new(&[], 4), Err(AlgorithmError::InvalidCatalog { .. })));
        assert!(Wave::new(&[1.0, 0.0], 4).is_err());
        assert!(Wave::new(&[1.0, -1.0], 4).is_err());
    }

    // Tests the full-superposition state after clear
    // Verified by initializing support from the same direction instead of the opposite
    #[test]
    fn test_clear_restores_superposition() -> wavecollapse::Result<()> {
        let asymmetric = Propagator::from_fn(2, |direction, t1, _| {
            direction == Direction::East || (direction == Direction::West && t1 == 0)
        });
        let mut wave = Wave::new(&[1.0, 1.0], 3)?;
        assert_eq!(wave.remaining(0), 0);

        wave.clear(&asymmetric);

        for cell in 0..3 {
            assert_eq!(wave.remaining(cell), 2);
            assert_eq!(wave.possible_patterns(cell).collect::<Vec<_>>(), vec![0, 1]);
            assert!((wave.entropy(cell) - 2.0_f64.ln()).abs() < 1e-12);
            // Support towards a direction counts the patterns allowed from the opposite side
            assert_eq!(wave.support(cell, 0, Direction::West), 2);
            assert_eq!(wave.support(cell, 1, Direction::West), 2);
            assert_eq!(wave.support(cell, 0, Direction::East), 2);
            assert_eq!(wave.support(cell, 1, Direction::East), 0);
            assert_eq!(wave.support(cell, 0, Direction::North), 0);
        }
        assert!((wave.starting_entropy() - 2.0_f64.ln()).abs() < 1e-12);
        assert_eq!(wave.pending(), 0);
        Ok(())
    }

    // Tests bookkeeping of a single ban and idempotence of repeated bans
    // Verified by pushing onto the stack before the already-banned check
    #[test]
    fn test_ban_updates_aggregates() -> wavecollapse::Result<()> {
        let mut wave = Wave::new(&[1.0, 1.0], 2)?;
        wave.clear(&differ());

        wave.ban(0, 1);
        assert!(!wave.is_possible(0, 1));
        assert!(wave.is_possible(0, 0));
        assert_eq!(wave.remaining(0), 1);
        assert!(wave.entropy(0).abs() < 1e-12);
        assert_eq!(wave.pending(), 1);
        for direction in Direction::ALL {
            assert_eq!(wave.support(0, 1, direction), 0);
        }

        wave.ban(0, 1);
        assert_eq!(wave.pending(), 1);
        assert_eq!(wave.remaining(0), 1);

        assert_eq!(wave.remaining(1), 2);
        Ok(())
    }

    // Tests that weight sums track the surviving patterns
    // Verified by subtracting the weight of the wrong pattern
    #[test]
    fn test_weighted_sums_follow_bans() -> wavecollapse::Result<()> {
        let mut wave = Wave::new(&[1.0, 2.0, 3.0], 1)?;
        wave.clear(&Propagator::from_fn(3, |_, _, _| true));

        wave.ban(0, 1);

        assert_eq!(wave.possible_patterns(0).collect::<Vec<_>>(), vec![0, 2]);
        assert!((wave.sum_of_weights(0) - 4.0).abs() < 1e-12);
        assert!((wave.sum_of_weight_log_weights(0) - 3.0 * 3.0_f64.ln()).abs() < 1e-12);
        let expected = 4.0_f64.ln() - 3.0 * 3.0_f64.ln() / 4.0;
        assert!((wave.entropy(0) - expected).abs() < 1e-12);
        Ok(())
    }

    // Tests that an emptied cell reports zero patterns and zero entropy
    // Verified by computing entropy from the emptied sums
    #[test]
    fn test_emptied_cell() -> wavecollapse::Result<()> {
        let mut wave = Wave::new(&[1.0, 1.0], 1)?;
        wave.clear(&differ());

        wave.ban(0, 0);
        wave.ban(0, 1);

        assert_eq!(wave.remaining(0), 0);
        assert_eq!(wave.possible_patterns(0).count(), 0);
        assert!(wave.entropy(0).abs() < f64::EPSILON);
        assert!(!wave.entropy(0).is_nan());
        Ok(())
    }

    // Tests that clear discards pending bans and restores every pattern
    // Verified by leaving the stack untouched in clear
    #[test]
    fn test_clear_after_bans() -> wavecollapse::Result<()> {
        let mut wave = Wave::new(&[1.0, 1.0], 2)?;
        wave.clear(&differ());
        wave.ban(1, 0);
        wave.ban(1, 1);

        wave.clear(&differ());

        assert_eq!(wave.pending(), 0);
        assert_eq!(wave.remaining(1), 2);
        assert_eq!(wave.cells(), 2);
        assert_eq!(wave.pattern_count(), 2);
        Ok(())
    }

    // Tests that ids outside the wave are ignored instead of aliasing another cell
    // Verified by computing the bit of pattern 2 in cell 0 as pattern 0 of cell 1
    #[test]
    fn test_out_of_range_ids() -> wavecollapse::Result<()> {
        let mut wave = Wave::new(&[1.0, 1.0], 2)?;
        wave.clear(&differ());

        wave.ban(0, 2);
        wave.ban(5, 0);

        assert_eq!(wave.pending(), 0);
        assert!(wave.is_possible(1, 0));
        assert_eq!(wave.remaining(0), 2);
        assert_eq!(wave.remaining(1), 2);
        assert!(!wave.is_possible(0, 2));
        assert_eq!(wave.possible_patterns(5).count(), 0);
        assert_eq!(wave.support(5, 0, Direction::West), 0);
        Ok(())
    }
}
