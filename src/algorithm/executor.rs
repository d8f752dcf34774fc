use crate::{
    algorithm::catalog::{Catalog, validate},
    algorithm::propagation::propagate,
    algorithm::selection::{CellChoice, collapse_cell, lowest_entropy_cell, resolved_assignment},
    algorithm::wave::Wave,
    io::error::Result,
    io::render::Render,
    math::random::RandomSource,
    spatial::Grid,
};
use tracing::{debug, trace};

/// Result of a single observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// A cell was collapsed; propagation should follow
    Continue,
    /// Every cell holds exactly one pattern
    Success,
    /// Some cell has no possible pattern
    Contradiction,
}

/// Lifecycle of a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Allocated but never cleared
    Ready,
    /// Cleared and possibly partially collapsed
    InProgress,
    /// Every cell resolved, the observed assignment is available
    Complete,
    /// A cell ran out of patterns; clear before generating again
    Contradiction,
}

/// Wave function collapse engine over any catalog
///
/// Owns the catalog, the grid and the generation state. A generation is a sequence of
/// observe/propagate steps ending in success or contradiction; there is no backtracking,
/// so a contradiction can only be answered by clearing and trying another random sequence.
pub struct Model<C> {
    catalog: C,
    grid: Grid,
    wave: Wave,
    observed: Option<Vec<usize>>,
    status: GenerationStatus,
    steps: usize,
}

impl<C: Catalog> Model<C> {
    /// Set up an engine for a `width`×`height` output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either dimension is zero or too large
    /// - The catalog is empty, has a non-positive weight or a malformed propagator
    /// - The catalog rejects the output geometry
    pub fn new(catalog: C, width: usize, height: usize, periodic: bool) -> Result<Self> {
        let grid = Grid::new(width, height, periodic)?;
        validate(&catalog)?;
        catalog.check_grid(&grid)?;

        let wave = Wave::new(catalog.weights(), grid.len())?;

        debug!(
            width,
            height,
            periodic,
            patterns = catalog.pattern_count(),
            "initialized model"
        );

        Ok(Self {
            catalog,
            grid,
            wave,
            observed: None,
            status: GenerationStatus::Ready,
            steps: 0,
        })
    }

    /// Reset to full superposition, then apply and propagate the catalog's seeding bans
    pub fn clear(&mut self) {
        self.wave.clear(self.catalog.propagator());
        self.catalog.seed(&self.grid, &mut self.wave);
        propagate(&mut self.wave, &self.catalog, &self.grid);

        self.observed = None;
        self.status = GenerationStatus::InProgress;
        self.steps = 0;
    }

    /// Collapse the lowest-entropy cell, or report that the generation has ended
    pub fn observe<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Observation {
        if self.status == GenerationStatus::Ready {
            self.clear();
        }
        match lowest_entropy_cell(&self.wave, &self.catalog, &self.grid, rng) {
            CellChoice::Contradiction => {
                self.status = GenerationStatus::Contradiction;
                Observation::Contradiction
            }
            CellChoice::Resolved => {
                self.observed = Some(resolved_assignment(&self.wave));
                self.status = GenerationStatus::Complete;
                Observation::Success
            }
            CellChoice::Collapse(cell) => {
                let chosen = collapse_cell(&mut self.wave, cell, rng);
                trace!(cell, pattern = chosen, "collapsed cell");
                Observation::Continue
            }
        }
    }

    /// Propagate every pending ban
    pub fn propagate(&mut self) {
        propagate(&mut self.wave, &self.catalog, &self.grid);
    }

    /// One observe/propagate step
    ///
    /// Returns `Some(success)` once the generation has ended.
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<bool> {
        match self.status {
            GenerationStatus::Complete => return Some(true),
            GenerationStatus::Contradiction => return Some(false),
            GenerationStatus::Ready => self.clear(),
            GenerationStatus::InProgress => {}
        }

        self.steps += 1;
        match self.observe(rng) {
            Observation::Success => Some(true),
            Observation::Contradiction => Some(false),
            Observation::Continue => {
                self.propagate();
                None
            }
        }
    }

    /// Start a fresh generation and run it for at most `limit` steps (unbounded if `None`)
    ///
    /// Returns `false` only on contradiction; running out of steps returns `true` with the
    /// generation left in progress.
    pub fn run<R: RandomSource + ?Sized>(&mut self, rng: &mut R, limit: Option<usize>) -> bool {
        self.clear();
        self.advance(rng, limit)
    }

    /// Run a complete generation from scratch
    pub fn generate<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.run(rng, None)
    }

    /// Continue the current generation for at most `steps` steps (unbounded if `None`)
    /// without clearing it
    ///
    /// A model that was never cleared is cleared first. Returns `false` only on contradiction.
    pub fn iterate<R: RandomSource + ?Sized>(&mut self, rng: &mut R, steps: Option<usize>) -> bool {
        self.advance(rng, steps)
    }

    fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R, limit: Option<usize>) -> bool {
        let mut taken = 0;
        while limit.is_none_or(|limit| taken < limit) {
            taken += 1;
            if let Some(success) = self.step(rng) {
                debug!(steps = self.steps, success, "generation finished");
                return success;
            }
        }
        true
    }

    /// Whether the last generation resolved every cell
    pub fn is_generation_complete(&self) -> bool {
        self.status == GenerationStatus::Complete
    }

    /// Current lifecycle state
    pub const fn status(&self) -> GenerationStatus {
        self.status
    }

    /// Observe/propagate steps taken since the last clear
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Pattern chosen for every cell, available once the generation is complete
    pub fn observed(&self) -> Option<&[usize]> {
        self.observed.as_deref()
    }

    /// Generation state, for inspection and partial rendering
    pub const fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Mutable generation state, for applying external constraints before propagating
    pub const fn wave_mut(&mut self) -> &mut Wave {
        &mut self.wave
    }

    /// Output grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The catalog driving this model
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }
}

impl<C: Catalog + Render> Model<C> {
    /// RGBA pixels of the generation
    ///
    /// A complete generation is drawn from the observed patterns; anything else is drawn
    /// as a blend of every pattern still possible.
    ///
    /// # Errors
    ///
    /// Returns an error if an observed pattern is outside the catalog
    pub fn graphics(&self) -> Result<Vec<u8>> {
        match &self.observed {
            Some(observed) if self.is_generation_complete() => {
                self.catalog.render_observed(&self.grid, observed)
            }
            _ => Ok(self.catalog.render_superposition(&self.grid, &self.wave)),
        }
    }

    /// Pixel dimensions of [`Model::graphics`]
    pub fn image_dimensions(&self) -> (u32, u32) {
        self.catalog.image_dimensions(&self.grid)
    }
}
