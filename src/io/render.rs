//! Projection of a generation into an RGBA pixel buffer

use crate::algorithm::wave::Wave;
use crate::io::error::Result;
use crate::spatial::Grid;

/// Catalogs that know how to draw their patterns
pub trait Render {
    /// Width and height of the rendered image in pixels
    fn image_dimensions(&self, grid: &Grid) -> (u32, u32);

    /// Draw a complete assignment of one pattern per cell
    ///
    /// # Errors
    ///
    /// Returns an error if an observed pattern is outside the catalog
    fn render_observed(&self, grid: &Grid, observed: &[usize]) -> Result<Vec<u8>>;

    /// Draw an unfinished generation as a blend of the patterns each cell still allows
    fn render_superposition(&self, grid: &Grid, wave: &Wave) -> Vec<u8>;
}

/// Round and clamp an accumulated channel value into a byte
pub fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
