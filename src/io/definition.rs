//! Tileset definition files
//!
//! A definition is a JSON document listing tiles (name, symmetry class, weight and
//! optionally inline RGBA bitmaps), horizontal adjacency rules between oriented tiles,
//! and named subsets. Bitmaps missing from the document are read from PNG files next to
//! it: `<name>.png`, or `<name> <k>.png` per orientation when the tileset is unique.

use crate::io::configuration::DEFAULT_TILE_SIZE;
use crate::io::error::{AlgorithmError, Result, invalid_parameter, invalid_source};
use crate::io::image::load_rgba;
use crate::spatial::symmetry::{ACTIONS, Symmetry};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const fn default_tile_size() -> usize {
    DEFAULT_TILE_SIZE
}

const fn default_weight() -> f64 {
    1.0
}

const fn default_symmetry() -> Symmetry {
    Symmetry::X
}

/// A complete tileset
#[derive(Debug, Clone, Deserialize)]
pub struct TilesetDefinition {
    /// Side length of every tile bitmap in pixels
    #[serde(rename = "tilesize", default = "default_tile_size")]
    pub tile_size: usize,
    /// Whether each orientation has its own bitmap instead of being derived by rotation
    #[serde(default)]
    pub unique: bool,
    /// Tiles in declaration order, which fixes the id assignment
    pub tiles: Vec<TileDefinition>,
    /// Horizontal adjacency rules
    #[serde(default)]
    pub neighbors: Vec<NeighborRule>,
    /// Named tile subsets
    #[serde(default)]
    pub subsets: HashMap<String, Vec<String>>,
}

/// One authored tile
#[derive(Debug, Clone, Deserialize)]
pub struct TileDefinition {
    /// Unique tile name
    pub name: String,
    /// Symmetry class, `X` when omitted
    #[serde(default = "default_symmetry")]
    pub symmetry: Symmetry,
    /// Relative frequency shared by all orientations
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Flat RGBA bitmaps: one, or one per orientation for unique tilesets
    ///
    /// The document may give a single bitmap as a flat byte array or any number of them
    /// as an array of arrays.
    #[serde(rename = "bitmap", default, deserialize_with = "single_or_many_bitmaps")]
    pub bitmaps: Vec<Vec<u8>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BitmapField {
    Single(Vec<u8>),
    Many(Vec<Vec<u8>>),
}

fn single_or_many_bitmaps<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match BitmapField::deserialize(deserializer)? {
        // An empty array carries no bitmap at all
        BitmapField::Single(bytes) if bytes.is_empty() => Vec::new(),
        BitmapField::Single(bytes) => vec![bytes],
        BitmapField::Many(bitmaps) => bitmaps,
    })
}

/// `left` may sit immediately west of `right`
///
/// Each side names a tile, optionally followed by a space and an orientation in 0..8.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NeighborRule {
    /// Tile on the left
    pub left: String,
    /// Tile on the right
    pub right: String,
}

/// A tile name with an orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileReference<'a> {
    /// Tile name
    pub name: &'a str,
    /// Orientation, an index into the tile's action row
    pub orientation: usize,
}

impl<'a> TileReference<'a> {
    /// Parse `"name"` or `"name k"`
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is empty, the orientation is not a number below 8,
    /// or extra words follow it
    pub fn parse(text: &'a str) -> Result<Self> {
        let mut words = text.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| invalid_parameter("neighbor", &text, &"tile reference is empty"))?;
        let orientation = match words.next() {
            None => 0,
            Some(word) => word
                .parse::<usize>()
                .ok()
                .filter(|&k| k < ACTIONS)
                .ok_or_else(|| {
                    invalid_parameter("neighbor", &text, &"orientation must be between 0 and 7")
                })?,
        };
        if words.next().is_some() {
            return Err(invalid_parameter(
                "neighbor",
                &text,
                &"expected a tile name and at most one orientation",
            ));
        }
        Ok(Self { name, orientation })
    }
}

impl TilesetDefinition {
    /// Parse a definition from JSON text, without touching the filesystem
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid definition
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AlgorithmError::Definition {
            path: origin.to_path_buf(),
            source: e,
        })
    }

    /// Number of bitmaps tile `tile` needs
    pub const fn bitmaps_required(&self, tile: &TileDefinition) -> usize {
        if self.unique {
            tile.symmetry.cardinality()
        } else {
            1
        }
    }
}

/// Load a definition and any bitmaps it does not carry inline
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read or parsed
/// - A tile bitmap file is missing or cannot be decoded
/// - A bitmap does not match the declared tile size
pub fn load_definition<P: AsRef<Path>>(path: P) -> Result<TilesetDefinition> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| AlgorithmError::FileSystem {
        path: path.to_path_buf(),
        operation: "read definition",
        source: e,
    })?;
    let mut definition = TilesetDefinition::from_json(&text, path)?;
    let directory = path.parent().unwrap_or_else(|| Path::new(""));

    let unique = definition.unique;
    let tile_size = definition.tile_size;
    for tile in &mut definition.tiles {
        if !tile.bitmaps.is_empty() {
            continue;
        }
        let count = if unique { tile.symmetry.cardinality() } else { 1 };
        for orientation in 0..count {
            let file = bitmap_path(directory, &tile.name, unique.then_some(orientation));
            tile.bitmaps.push(load_bitmap(&file, tile_size)?);
        }
    }

    debug!(
        path = %path.display(),
        tiles = definition.tiles.len(),
        rules = definition.neighbors.len(),
        "loaded tileset definition"
    );

    Ok(definition)
}

/// File holding the bitmap of a tile, or of one of its orientations
pub fn bitmap_path(directory: &Path, name: &str, orientation: Option<usize>) -> PathBuf {
    match orientation {
        Some(k) => directory.join(format!("{name} {k}.png")),
        None => directory.join(format!("{name}.png")),
    }
}

fn load_bitmap(path: &Path, tile_size: usize) -> Result<Vec<u8>> {
    let (pixels, width, height) = load_rgba(path)?;
    if width as usize != tile_size || height as usize != tile_size {
        return Err(invalid_source(&format!(
            "tile bitmap '{}' is {width}x{height}, expected {tile_size}x{tile_size}",
            path.display()
        )));
    }
    Ok(pixels)
}
