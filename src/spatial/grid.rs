//! Output grid geometry and neighbourhood directions
//!
//! Cells are linearized row-major as `i = x + y * width`. Directions follow the fixed
//! order west, north, east, south so that `opposite(d) = (d + 2) % 4`.

use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, invalid_parameter};

/// One of the four axis-aligned neighbour directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `(-1, 0)`
    West,
    /// `(0, 1)`
    North,
    /// `(1, 0)`
    East,
    /// `(0, -1)`
    South,
}

impl Direction {
    /// All directions in propagator order
    pub const ALL: [Self; 4] = [Self::West, Self::North, Self::East, Self::South];

    /// Position of this direction in propagator order
    pub const fn index(self) -> usize {
        match self {
            Self::West => 0,
            Self::North => 1,
            Self::East => 2,
            Self::South => 3,
        }
    }

    /// Unit offset `(dx, dy)`
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::West => (-1, 0),
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
        }
    }

    /// The direction pointing back
    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
        }
    }
}

/// Dimensions and wrapping mode of a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    periodic: bool,
}

impl Grid {
    /// Create a grid, rejecting empty or oversized dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds `MAX_GRID_DIMENSION`
    pub fn new(width: usize, height: usize, periodic: bool) -> Result<Self> {
        for (parameter, value) in [("width", width), ("height", height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }

        Ok(Self {
            width,
            height,
            periodic,
        })
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether opposite edges are adjacent
    pub const fn periodic(&self) -> bool {
        self.periodic
    }

    /// Total number of cells
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// A grid always has at least one cell
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Linear index of `(x, y)`
    pub const fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    /// Coordinates of a linear index
    pub const fn coordinates(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Cell one step from `index` in `direction`, without any wrapping
    ///
    /// The result may lie outside the grid; callers decide whether that is a boundary.
    pub const fn step(&self, index: usize, direction: Direction) -> (isize, isize) {
        let (x, y) = self.coordinates(index);
        let (dx, dy) = direction.offset();
        (x as isize + dx, y as isize + dy)
    }

    /// Wrap possibly out-of-range coordinates back onto the torus
    pub const fn wrap(&self, x: isize, y: isize) -> usize {
        let x = x.rem_euclid(self.width as isize) as usize;
        let y = y.rem_euclid(self.height as isize) as usize;
        self.index(x, y)
    }

    /// Whether `(x, y)` lies inside the grid
    pub const fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}
