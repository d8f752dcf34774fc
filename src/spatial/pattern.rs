//! Square patterns of palette indices
//!
//! Patterns are stored row-major (`cells[x + y * size]`). Rotation and reflection follow
//! the same convention as tile bitmaps, so the eight-element orbit built here lines up
//! with the orientation order used by tile symmetry classes.

use ndarray::Array2;

/// An N×N block of palette indices
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    size: usize,
    cells: Vec<usize>,
}

impl Pattern {
    /// Build a pattern by evaluating `f(x, y)` for every cell
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(f(x, y));
            }
        }
        Self { size, cells }
    }

    /// Extract the window whose top-left corner is `(x, y)`, wrapping around the sample
    ///
    /// `sample` is indexed `[row, col]`.
    pub fn from_sample(sample: &Array2<usize>, x: usize, y: usize, size: usize) -> Self {
        let (rows, cols) = sample.dim();
        Self::from_fn(size, |dx, dy| {
            sample
                .get(((y + dy) % rows, (x + dx) % cols))
                .copied()
                .unwrap_or(0)
        })
    }

    /// Side length
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Row-major cell values
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Value at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells.get(x + y * self.size).copied()
    }

    /// Quarter-turn rotation
    #[must_use]
    pub fn rotate(&self) -> Self {
        let n = self.size;
        Self::from_fn(n, |x, y| self.cells.get(n - 1 - y + x * n).copied().unwrap_or(0))
    }

    /// Mirror across the vertical axis
    #[must_use]
    pub fn reflect(&self) -> Self {
        let n = self.size;
        Self::from_fn(n, |x, y| self.cells.get(n - 1 - x + y * n).copied().unwrap_or(0))
    }

    /// The eight rotations and reflections in canonical order
    ///
    /// identity, reflect, rotate, reflect, rotate, reflect, rotate, reflect; each
    /// reflection applies to the rotation immediately before it.
    pub fn symmetries(&self) -> [Self; 8] {
        let p0 = self.clone();
        let p1 = p0.reflect();
        let p2 = p0.rotate();
        let p3 = p2.reflect();
        let p4 = p2.rotate();
        let p5 = p4.reflect();
        let p6 = p4.rotate();
        let p7 = p6.reflect();
        [p0, p1, p2, p3, p4, p5, p6, p7]
    }

    /// Whether `other`, shifted by `(dx, dy)`, matches this pattern wherever they overlap
    pub fn agrees(&self, other: &Self, dx: isize, dy: isize) -> bool {
        let n = self.size as isize;
        let (xmin, xmax) = if dx < 0 { (0, dx + n) } else { (dx, n) };
        let (ymin, ymax) = if dy < 0 { (0, dy + n) } else { (dy, n) };

        for y in ymin..ymax {
            for x in xmin..xmax {
                let own = self.get(x as usize, y as usize);
                let shifted = other.get((x - dx) as usize, (y - dy) as usize);
                if own != shifted {
                    return false;
                }
            }
        }
        true
    }
}
