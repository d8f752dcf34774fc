//! PNG import and export of raw RGBA buffers

use crate::io::error::{AlgorithmError, Result};
use image::{ImageBuffer, Rgba};
use std::path::Path;

/// Decode an image file into tightly packed RGBA bytes
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, u32, u32)> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| AlgorithmError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();
    Ok((rgba_img.into_raw(), width, height))
}

/// Save an RGBA buffer as a PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is not `width × height × 4` bytes
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_rgba_as_png<P: AsRef<Path>>(
    pixels: &[u8],
    width: u32,
    height: u32,
    output_path: P,
) -> Result<()> {
    let output_path = output_path.as_ref();
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels.to_vec())
        .ok_or_else(|| AlgorithmError::InvalidSourceData {
            reason: format!(
                "{} bytes cannot form a {width}x{height} RGBA image",
                pixels.len()
            ),
        })?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
