//! Overlapping model catalog
//!
//! Every N×N window of the sample (optionally with its rotations and reflections) becomes
//! a pattern weighted by how often it occurs. Two patterns may sit side by side when they
//! agree on every pixel of their overlap.

use crate::{
    algorithm::catalog::{Catalog, Propagator},
    algorithm::wave::Wave,
    analysis::sample::Sample,
    io::configuration::{DEFAULT_PATTERN_SIZE, DEFAULT_SYMMETRY},
    io::error::{AlgorithmError, Result, invalid_parameter},
    io::render::{Render, channel},
    spatial::{Grid, pattern::Pattern},
};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Parameters of pattern extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlappingOptions {
    /// Side length N of the extracted patterns
    pub pattern_size: usize,
    /// Whether windows may wrap around the sample edges
    pub periodic_input: bool,
    /// How many of the eight rotations/reflections to include (1..=8)
    pub symmetry: usize,
    /// Pattern forced along the bottom row; negative values count from the end, 0 disables
    pub ground: i64,
}

impl Default for OverlappingOptions {
    fn default() -> Self {
        Self {
            pattern_size: DEFAULT_PATTERN_SIZE,
            periodic_input: true,
            symmetry: DEFAULT_SYMMETRY,
            ground: 0,
        }
    }
}

/// Patterns, weights and adjacency extracted from a sample image
#[derive(Debug, Clone)]
pub struct OverlappingCatalog {
    pattern_size: usize,
    patterns: Vec<Pattern>,
    weights: Vec<f64>,
    propagator: Propagator,
    palette: Vec<[u8; 4]>,
    ground: Option<usize>,
}

impl OverlappingCatalog {
    /// Extract the catalog of a sample
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pattern size is zero
    /// - The symmetry count is outside 1..=8
    /// - The sample is smaller than a pattern and not periodic
    pub fn new(sample: &Sample, options: &OverlappingOptions) -> Result<Self> {
        let n = options.pattern_size;
        if n == 0 {
            return Err(invalid_parameter(
                "pattern_size",
                &n,
                &"must be at least 1",
            ));
        }
        if !(1..=8).contains(&options.symmetry) {
            return Err(invalid_parameter(
                "symmetry",
                &options.symmetry,
                &"must be between 1 and 8",
            ));
        }
        if !options.periodic_input && (sample.width() < n || sample.height() < n) {
            return Err(AlgorithmError::InvalidSourceData {
                reason: format!(
                    "a {}x{} sample cannot hold a {n}x{n} pattern without wrapping",
                    sample.width(),
                    sample.height()
                ),
            });
        }

        let (patterns, weights) = Self::extract_patterns(sample, options);
        let propagator = Propagator::from_fn(patterns.len(), |direction, t1, t2| {
            let (dx, dy) = direction.offset();
            match (patterns.get(t1), patterns.get(t2)) {
                (Some(first), Some(second)) => first.agrees(second, dx, dy),
                _ => false,
            }
        });

        let ground = Self::normalize_ground(options.ground, patterns.len());

        debug!(
            patterns = patterns.len(),
            colors = sample.color_count(),
            pattern_size = n,
            ?ground,
            "built overlapping catalog"
        );

        Ok(Self {
            pattern_size: n,
            patterns,
            weights,
            propagator,
            palette: sample.palette().to_vec(),
            ground,
        })
    }

    /// Load a sample image and extract its catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be loaded or the options are invalid
    pub fn from_png_file<P: AsRef<Path>>(path: P, options: &OverlappingOptions) -> Result<Self> {
        let sample = Sample::from_png_file(path)?;
        Self::new(&sample, options)
    }

    // Distinct patterns in first-seen order, weighted by occurrence count
    fn extract_patterns(sample: &Sample, options: &OverlappingOptions) -> (Vec<Pattern>, Vec<f64>) {
        let n = options.pattern_size;
        let (x_limit, y_limit) = if options.periodic_input {
            (sample.width(), sample.height())
        } else {
            (sample.width() - n + 1, sample.height() - n + 1)
        };

        let mut ids: HashMap<Pattern, usize> = HashMap::new();
        let mut patterns = Vec::new();
        let mut weights: Vec<f64> = Vec::new();

        for y in 0..y_limit {
            for x in 0..x_limit {
                let window = Pattern::from_sample(sample.data(), x, y, n);
                for variant in window.symmetries().into_iter().take(options.symmetry) {
                    if let Some(&id) = ids.get(&variant) {
                        if let Some(weight) = weights.get_mut(id) {
                            *weight += 1.0;
                        }
                    } else {
                        ids.insert(variant.clone(), patterns.len());
                        patterns.push(variant);
                        weights.push(1.0);
                    }
                }
            }
        }

        (patterns, weights)
    }

    // Wraps into [0, T); zero means no ground
    fn normalize_ground(ground: i64, pattern_count: usize) -> Option<usize> {
        if pattern_count == 0 {
            return None;
        }
        let normalized = ground.rem_euclid(pattern_count as i64) as usize;
        (normalized != 0).then_some(normalized)
    }

    /// Extracted patterns, indexed by pattern id
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Pattern side length N
    pub const fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    /// RGBA value of each colour id
    pub fn palette(&self) -> &[[u8; 4]] {
        &self.palette
    }

    /// Normalized ground pattern, if any
    pub const fn ground(&self) -> Option<usize> {
        self.ground
    }

    fn color_of(&self, pattern: usize, x: usize, y: usize) -> Option<[u8; 4]> {
        let id = self.patterns.get(pattern)?.get(x, y)?;
        self.palette.get(id).copied()
    }
}

impl Catalog for OverlappingCatalog {
    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    fn on_boundary(&self, grid: &Grid, x: isize, y: isize) -> bool {
        let n = self.pattern_size as isize;
        !grid.periodic()
            && (x < 0
                || y < 0
                || x + n > grid.width() as isize
                || y + n > grid.height() as isize)
    }

    fn check_grid(&self, grid: &Grid) -> Result<()> {
        if grid.width() < self.pattern_size || grid.height() < self.pattern_size {
            return Err(AlgorithmError::InvalidGeometry {
                width: grid.width(),
                height: grid.height(),
                minimum: self.pattern_size,
            });
        }
        Ok(())
    }

    fn seed(&self, grid: &Grid, wave: &mut Wave) {
        let Some(ground) = self.ground else {
            return;
        };
        let bottom = grid.height() - 1;

        for x in 0..grid.width() {
            for t in (0..self.patterns.len()).filter(|&t| t != ground) {
                wave.ban(grid.index(x, bottom), t);
            }
            for y in 0..bottom {
                wave.ban(grid.index(x, y), ground);
            }
        }
    }
}

impl Render for OverlappingCatalog {
    fn image_dimensions(&self, grid: &Grid) -> (u32, u32) {
        (grid.width() as u32, grid.height() as u32)
    }

    fn render_observed(&self, grid: &Grid, observed: &[usize]) -> Result<Vec<u8>> {
        let n = self.pattern_size;
        let mut pixels = Vec::with_capacity(grid.len() * 4);

        for y in 0..grid.height() {
            // Cells near the far edges cannot anchor a whole pattern, read from the last one that can
            let dy = if y + n <= grid.height() { 0 } else { n - 1 };
            for x in 0..grid.width() {
                let dx = if x + n <= grid.width() { 0 } else { n - 1 };

                let cell = grid.index(x - dx, y - dy);
                let pattern = observed.get(cell).copied().unwrap_or(usize::MAX);
                let color = self.color_of(pattern, dx, dy).ok_or(
                    AlgorithmError::InvalidTileIndex {
                        index: pattern,
                        max_tiles: self.patterns.len(),
                    },
                )?;
                pixels.extend_from_slice(&color);
            }
        }

        Ok(pixels)
    }

    fn render_superposition(&self, grid: &Grid, wave: &Wave) -> Vec<u8> {
        let n = self.pattern_size;
        let mut pixels = Vec::with_capacity(grid.len() * 4);

        for i in 0..grid.len() {
            let (x, y) = grid.coordinates(i);
            let mut contributors = 0_u32;
            let mut sum = [0.0_f64; 4];

            for dy in 0..n {
                for dx in 0..n {
                    let sx = x as isize - dx as isize;
                    let sy = y as isize - dy as isize;
                    let source = grid.wrap(sx, sy);
                    let (wx, wy) = grid.coordinates(source);
                    if self.on_boundary(grid, wx as isize, wy as isize) {
                        continue;
                    }

                    for t in wave.possible_patterns(source) {
                        if let Some(color) = self.color_of(t, dx, dy) {
                            contributors += 1;
                            for (acc, &c) in sum.iter_mut().zip(color.iter()) {
                                *acc += f64::from(c);
                            }
                        }
                    }
                }
            }

            if contributors == 0 {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                let scale = f64::from(contributors);
                pixels.extend(sum.iter().map(|&s| channel(s / scale)));
            }
        }

        pixels
    }
}
