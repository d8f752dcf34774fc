//! Conversion of RGBA samples into palette-indexed grids

use crate::io::error::{AlgorithmError, Result, invalid_source};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;

/// A sample image reduced to small integer colour ids
///
/// Ids are assigned in first-seen row-major order, so the same image always produces
/// the same palette and the same pattern ids downstream.
#[derive(Debug, Clone)]
pub struct Sample {
    data: Array2<usize>,
    palette: Vec<[u8; 4]>,
}

impl Sample {
    /// Load a sample from an image file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file at the given path cannot be opened or read
    /// - The file is not a valid image format
    /// - The image is empty
    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let img = image::open(&path_buf).map_err(|e| AlgorithmError::ImageLoad {
            path: path_buf,
            source: e,
        })?;
        let rgba_img = img.to_rgba8();
        let (width, height) = (rgba_img.width() as usize, rgba_img.height() as usize);

        Self::from_rgba(rgba_img.as_raw(), width, height)
    }

    /// Build a sample from a tightly packed RGBA buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty or the buffer is not `width × height × 4` bytes
    pub fn from_rgba(pixels: &[u8], width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_source(&"sample image has no pixels"));
        }
        if pixels.len() != width * height * 4 {
            return Err(invalid_source(&format!(
                "expected {} bytes for a {width}x{height} RGBA sample, got {}",
                width * height * 4,
                pixels.len()
            )));
        }

        let mut lookup: HashMap<[u8; 4], usize> = HashMap::new();
        let mut palette = Vec::new();
        let mut data = Array2::zeros((height, width));

        let colors = pixels
            .chunks_exact(4)
            .filter_map(|chunk| <[u8; 4]>::try_from(chunk).ok());
        for (i, color) in colors.enumerate() {
            let id = *lookup.entry(color).or_insert_with(|| {
                palette.push(color);
                palette.len() - 1
            });
            if let Some(cell) = data.get_mut((i / width, i % width)) {
                *cell = id;
            }
        }

        Ok(Self { data, palette })
    }

    /// Build a sample directly from colour ids and their palette
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty or an id has no palette entry
    pub fn from_indices(data: Array2<usize>, palette: Vec<[u8; 4]>) -> Result<Self> {
        if data.is_empty() {
            return Err(invalid_source(&"sample image has no pixels"));
        }
        if let Some(&bad) = data.iter().find(|&&id| id >= palette.len()) {
            return Err(invalid_source(&format!(
                "colour id {bad} has no palette entry ({} colours)",
                palette.len()
            )));
        }
        Ok(Self { data, palette })
    }

    /// Colour ids indexed `[row, col]`
    pub const fn data(&self) -> &Array2<usize> {
        &self.data
    }

    /// RGBA value of each colour id
    pub fn palette(&self) -> &[[u8; 4]] {
        &self.palette
    }

    /// Number of distinct colours
    pub fn color_count(&self) -> usize {
        self.palette.len()
    }

    /// Sample width in pixels
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// Sample height in pixels
    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}
