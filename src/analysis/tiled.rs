//! Simple tiled model catalog
//!
//! Every authored tile expands into one pattern per orientation of its symmetry class.
//! Adjacency rules are authored for horizontal neighbours only; the action table turns
//! each rule into its rotated and mirrored consequences, which supplies the vertical
//! compatibilities as well.

use crate::{
    algorithm::catalog::{Catalog, Propagator, validate},
    algorithm::wave::Wave,
    io::definition::{TileReference, TilesetDefinition},
    io::error::{AlgorithmError, Result, invalid_parameter, invalid_source},
    io::render::{Render, channel},
    spatial::Grid,
    spatial::symmetry::ACTIONS,
};
use ndarray::{Array3, Axis};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Oriented tiles, their weights and adjacency
#[derive(Debug, Clone)]
pub struct TiledCatalog {
    tile_size: usize,
    /// Row-major RGBA pixels of every oriented tile
    tiles: Vec<Vec<[u8; 4]>>,
    /// Authored name and orientation of every pattern id
    names: Vec<(String, usize)>,
    weights: Vec<f64>,
    propagator: Propagator,
    placeholder: Option<[u8; 4]>,
}

impl TiledCatalog {
    /// Expand a tileset, optionally restricted to one of its named subsets
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The subset is not defined, or names a tile that is not
    /// - A rule refers to an unknown tile or an orientation outside 0..8
    /// - A bitmap is missing or does not match the tile size
    /// - The expanded catalog is empty or has a non-positive weight
    pub fn new(definition: &TilesetDefinition, subset: Option<&str>) -> Result<Self> {
        let tile_size = definition.tile_size;
        if tile_size == 0 {
            return Err(invalid_parameter("tilesize", &tile_size, &"must be at least 1"));
        }

        let known: HashSet<&str> = definition.tiles.iter().map(|t| t.name.as_str()).collect();
        let included = Self::resolve_subset(definition, subset, &known)?;
        let is_included = |name: &str| included.as_ref().is_none_or(|s| s.contains(name));

        let mut first_of: HashMap<&str, usize> = HashMap::new();
        let mut action: Vec<[usize; ACTIONS]> = Vec::new();
        let mut tiles: Vec<Vec<[u8; 4]>> = Vec::new();
        let mut names = Vec::new();
        let mut weights = Vec::new();

        for tile in definition.tiles.iter().filter(|t| is_included(&t.name)) {
            let first = action.len();
            let cardinality = tile.symmetry.cardinality();
            first_of.insert(tile.name.as_str(), first);
            action.extend(tile.symmetry.actions(first));

            let required = definition.bitmaps_required(tile);
            if tile.bitmaps.len() < required {
                return Err(invalid_source(&format!(
                    "tile '{}' has {} bitmaps, {required} required",
                    tile.name,
                    tile.bitmaps.len()
                )));
            }

            if definition.unique {
                for bitmap in tile.bitmaps.iter().take(cardinality) {
                    tiles.push(Self::decode_bitmap(&tile.name, bitmap, tile_size)?);
                }
            } else {
                let base = tile.bitmaps.first().ok_or_else(|| {
                    invalid_source(&format!("tile '{}' has no bitmap", tile.name))
                })?;
                let mut oriented = vec![Self::decode_bitmap(&tile.name, base, tile_size)?];
                for t in 1..cardinality {
                    let derived = if t < 4 {
                        oriented.last().map(|previous| rotate_pixels(previous, tile_size))
                    } else {
                        oriented.get(t - 4).map(|unmirrored| reflect_pixels(unmirrored, tile_size))
                    };
                    oriented.extend(derived);
                }
                tiles.extend(oriented);
            }

            for t in 0..cardinality {
                names.push((tile.name.clone(), t));
                weights.push(tile.weight);
            }
        }

        let pattern_count = action.len();
        let mut dense = Array3::from_elem((4, pattern_count, pattern_count), false);

        for rule in &definition.neighbors {
            let left = TileReference::parse(&rule.left)?;
            let right = TileReference::parse(&rule.right)?;
            for reference in [&left, &right] {
                if !known.contains(reference.name) {
                    return Err(AlgorithmError::UnknownTile {
                        name: reference.name.to_string(),
                    });
                }
            }
            let (Some(&left_first), Some(&right_first)) =
                (first_of.get(left.name), first_of.get(right.name))
            else {
                continue;
            };

            if let (Some(l), Some(r)) = (
                act(&action, left_first, left.orientation),
                act(&action, right_first, right.orientation),
            ) {
                mark_rule(&action, &mut dense, l, r);
            }
        }

        // East and south are the transposes of west and north
        for (source, target) in [(0, 2), (1, 3)] {
            let transposed = dense.index_axis(Axis(0), source).t().to_owned();
            dense.index_axis_mut(Axis(0), target).assign(&transposed);
        }

        let propagator = Propagator::from_fn(pattern_count, |direction, t1, t2| {
            dense
                .get([direction.index(), t1, t2])
                .copied()
                .unwrap_or(false)
        });

        debug!(
            tiles = first_of.len(),
            patterns = pattern_count,
            rules = definition.neighbors.len(),
            subset,
            "built tiled catalog"
        );

        let catalog = Self {
            tile_size,
            tiles,
            names,
            weights,
            propagator,
            placeholder: None,
        };
        validate(&catalog)?;
        Ok(catalog)
    }

    fn resolve_subset<'a>(
        definition: &'a TilesetDefinition,
        subset: Option<&str>,
        known: &HashSet<&str>,
    ) -> Result<Option<HashSet<&'a str>>> {
        let Some(name) = subset else {
            return Ok(None);
        };
        let members = definition
            .subsets
            .get(name)
            .ok_or_else(|| invalid_parameter("subset", &name, &"no subset with this name"))?;
        if let Some(unknown) = members.iter().find(|m| !known.contains(m.as_str())) {
            return Err(AlgorithmError::UnknownTile {
                name: unknown.clone(),
            });
        }
        Ok(Some(members.iter().map(String::as_str).collect()))
    }

    fn decode_bitmap(name: &str, bitmap: &[u8], tile_size: usize) -> Result<Vec<[u8; 4]>> {
        let expected = tile_size * tile_size * 4;
        if bitmap.len() != expected {
            return Err(invalid_source(&format!(
                "bitmap of tile '{name}' has {} bytes, expected {expected}",
                bitmap.len()
            )));
        }
        Ok(bitmap
            .chunks_exact(4)
            .filter_map(|c| <[u8; 4]>::try_from(c).ok())
            .collect())
    }

    /// Colour drawn for cells that are still fully undecided
    #[must_use]
    pub const fn with_placeholder(mut self, color: [u8; 4]) -> Self {
        self.placeholder = Some(color);
        self
    }

    /// Tile side length in pixels
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Authored tile name and orientation of a pattern id
    pub fn tile_name(&self, id: usize) -> Option<(&str, usize)> {
        self.names
            .get(id)
            .map(|(name, orientation)| (name.as_str(), *orientation))
    }

    /// Row-major pixels of an oriented tile
    pub fn tile_pixels(&self, id: usize) -> Option<&[[u8; 4]]> {
        self.tiles.get(id).map(Vec::as_slice)
    }

    // Writes one tile's worth of pixels at cell (x, y) of a row-major RGBA image
    fn blit(&self, pixels: &mut [u8], grid: &Grid, x: usize, y: usize, f: impl Fn(usize) -> [u8; 4]) {
        let ts = self.tile_size;
        let row_stride = grid.width() * ts;
        for yt in 0..ts {
            for xt in 0..ts {
                let offset = (x * ts + xt + (y * ts + yt) * row_stride) * 4;
                if let Some(target) = pixels.get_mut(offset..offset + 4) {
                    target.copy_from_slice(&f(xt + yt * ts));
                }
            }
        }
    }
}

// Image of pattern `t` under action `k`
fn act(action: &[[usize; ACTIONS]], t: usize, k: usize) -> Option<usize> {
    action.get(t).and_then(|row| row.get(k)).copied()
}

// Marks the horizontal rule `l | r` together with its rotated and mirrored images
fn mark_rule(action: &[[usize; ACTIONS]], dense: &mut Array3<bool>, l: usize, r: usize) -> Option<()> {
    let d = act(action, l, 1)?;
    let u = act(action, r, 1)?;
    let images = [
        (0, r, l),
        (0, act(action, r, 6)?, act(action, l, 6)?),
        (0, act(action, l, 4)?, act(action, r, 4)?),
        (0, act(action, l, 2)?, act(action, r, 2)?),
        (1, u, d),
        (1, act(action, d, 6)?, act(action, u, 6)?),
        (1, act(action, u, 4)?, act(action, d, 4)?),
        (1, act(action, d, 2)?, act(action, u, 2)?),
    ];
    for (direction, t1, t2) in images {
        *dense.get_mut([direction, t1, t2])? = true;
    }
    Some(())
}

/// Quarter-turn rotation of a square row-major bitmap
pub fn rotate_pixels(pixels: &[[u8; 4]], size: usize) -> Vec<[u8; 4]> {
    transform_pixels(pixels, size, |x, y| size - 1 - y + x * size)
}

/// Mirror of a square row-major bitmap across the vertical axis
pub fn reflect_pixels(pixels: &[[u8; 4]], size: usize) -> Vec<[u8; 4]> {
    transform_pixels(pixels, size, |x, y| size - 1 - x + y * size)
}

fn transform_pixels(
    pixels: &[[u8; 4]],
    size: usize,
    source: impl Fn(usize, usize) -> usize,
) -> Vec<[u8; 4]> {
    let mut result = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            result.push(pixels.get(source(x, y)).copied().unwrap_or_default());
        }
    }
    result
}

impl Catalog for TiledCatalog {
    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    fn on_boundary(&self, grid: &Grid, x: isize, y: isize) -> bool {
        !grid.periodic() && !grid.contains(x, y)
    }
}

impl Render for TiledCatalog {
    fn image_dimensions(&self, grid: &Grid) -> (u32, u32) {
        (
            (grid.width() * self.tile_size) as u32,
            (grid.height() * self.tile_size) as u32,
        )
    }

    fn render_observed(&self, grid: &Grid, observed: &[usize]) -> Result<Vec<u8>> {
        let mut pixels = vec![0; grid.len() * self.tile_size * self.tile_size * 4];

        for cell in 0..grid.len() {
            let (x, y) = grid.coordinates(cell);
            let id = observed.get(cell).copied().unwrap_or(usize::MAX);
            let tile = self
                .tiles
                .get(id)
                .ok_or(AlgorithmError::InvalidTileIndex {
                    index: id,
                    max_tiles: self.tiles.len(),
                })?;
            self.blit(&mut pixels, grid, x, y, |p| tile.get(p).copied().unwrap_or_default());
        }

        Ok(pixels)
    }

    fn render_superposition(&self, grid: &Grid, wave: &Wave) -> Vec<u8> {
        let mut pixels = vec![0; grid.len() * self.tile_size * self.tile_size * 4];

        for cell in 0..grid.len() {
            let (x, y) = grid.coordinates(cell);
            let amount = wave.remaining(cell);

            match self.placeholder {
                Some(color) if amount == self.tiles.len() => {
                    self.blit(&mut pixels, grid, x, y, |_| color);
                }
                _ if amount == 0 => {}
                _ => {
                    let lambda = 1.0 / wave.sum_of_weights(cell);
                    let possible: Vec<(f64, &[[u8; 4]])> = wave
                        .possible_patterns(cell)
                        .filter_map(|t| {
                            let weight = self.weights.get(t)?;
                            let tile = self.tiles.get(t)?;
                            Some((weight * lambda, tile.as_slice()))
                        })
                        .collect();
                    self.blit(&mut pixels, grid, x, y, |p| {
                        let mut sum = [0.0_f64; 4];
                        for &(weight, tile) in &possible {
                            let color = tile.get(p).copied().unwrap_or_default();
                            for (acc, c) in sum.iter_mut().zip(color) {
                                *acc += f64::from(c) * weight;
                            }
                        }
                        sum.map(channel)
                    });
                }
            }
        }

        pixels
    }
}
