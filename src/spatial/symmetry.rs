//! Tile symmetry classes
//!
//! A class fixes how many distinct orientations a tile has and how a quarter-turn
//! rotation and a mirror reflection permute them. The resulting action table is the
//! single source of truth for both oriented bitmaps and adjacency rule expansion.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Number of combined rotate/reflect operations recorded per orientation
pub const ACTIONS: usize = 8;

/// Symmetry class of a tile, named after the letter whose shape it shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Symmetry {
    /// Invariant under every rotation and reflection, one orientation
    #[serde(rename = "X", alias = "none")]
    X,
    /// Straight line, two orientations
    #[serde(rename = "I")]
    I,
    /// Diagonal, two orientations swapped by both rotation and reflection
    #[serde(rename = "\\", alias = "diagonal")]
    Diagonal,
    /// Corner, four orientations
    #[serde(rename = "L")]
    L,
    /// Junction, four orientations with a mirror axis
    #[serde(rename = "T")]
    T,
    /// No symmetry at all, eight orientations
    #[serde(rename = "F", alias = "full")]
    F,
}

impl Symmetry {
    /// Number of distinct orientations
    pub const fn cardinality(self) -> usize {
        match self {
            Self::X => 1,
            Self::I | Self::Diagonal => 2,
            Self::L | Self::T => 4,
            Self::F => 8,
        }
    }

    /// Orientation reached from `i` by a quarter-turn
    pub const fn rotate(self, i: usize) -> usize {
        match self {
            Self::X => i,
            Self::I | Self::Diagonal => 1 - i,
            Self::L | Self::T => (i + 1) % 4,
            Self::F => {
                if i < 4 {
                    (i + 1) % 4
                } else {
                    4 + (i - 1) % 4
                }
            }
        }
    }

    /// Orientation reached from `i` by a mirror reflection
    pub const fn reflect(self, i: usize) -> usize {
        match self {
            Self::X | Self::I => i,
            Self::Diagonal => 1 - i,
            Self::L => {
                if i % 2 == 0 {
                    i + 1
                } else {
                    i - 1
                }
            }
            Self::T => {
                if i % 2 == 0 {
                    i
                } else {
                    4 - i
                }
            }
            Self::F => {
                if i < 4 {
                    i + 4
                } else {
                    i - 4
                }
            }
        }
    }

    /// Action rows for every orientation, with ids offset by `first`
    ///
    /// Row `t` lists the ids reached from orientation `t` by rotating 0..4 times, then by
    /// reflecting each of those rotations.
    pub fn actions(self, first: usize) -> Vec<[usize; ACTIONS]> {
        (0..self.cardinality())
            .map(|t| {
                let r1 = self.rotate(t);
                let r2 = self.rotate(r1);
                let r3 = self.rotate(r2);
                [
                    first + t,
                    first + r1,
                    first + r2,
                    first + r3,
                    first + self.reflect(t),
                    first + self.reflect(r1),
                    first + self.reflect(r2),
                    first + self.reflect(r3),
                ]
            })
            .collect()
    }

    /// Canonical letter
    pub const fn letter(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::I => "I",
            Self::Diagonal => "\\",
            Self::L => "L",
            Self::T => "T",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Symmetry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" | "none" => Ok(Self::X),
            "I" => Ok(Self::I),
            "\\" | "diagonal" => Ok(Self::Diagonal),
            "L" => Ok(Self::L),
            "T" => Ok(Self::T),
            "F" | "full" => Ok(Self::F),
            other => Err(format!("unknown symmetry class '{other}'")),
        }
    }
}
