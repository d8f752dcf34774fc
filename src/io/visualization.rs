//! Frame capture and GIF generation for stepwise generation playback

use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{AlgorithmError, Result};
use image::{Delay, Frame, RgbaImage};
use std::path::Path;

/// Records rendered snapshots of a generation
///
/// Frames arrive once per observe/propagate step. When the requested frame delay is
/// shorter than viewers support, only every `skip_factor`-th frame is kept so the
/// animation keeps its apparent speed.
pub struct FrameCapture {
    frames: Vec<Vec<u8>>,
    width: u32,
    height: u32,
    delay_ms: u32,
    skip_factor: usize,
    offered: usize,
}

impl FrameCapture {
    /// Prepare a capture of `width`×`height` RGBA frames
    pub fn new(width: u32, height: u32, frame_delay_ms: u32) -> Self {
        let frame_delay_ms = frame_delay_ms.max(1);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        Self {
            frames: Vec::new(),
            width,
            height,
            delay_ms: frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS),
            skip_factor,
            offered: 0,
        }
    }

    /// Offer a frame, keeping it if it falls on the sampling interval
    pub fn capture(&mut self, pixels: &[u8]) {
        if self.offered % self.skip_factor == 0 {
            self.frames.push(pixels.to_vec());
        }
        self.offered += 1;
    }

    /// Keep the final state regardless of sampling
    pub fn capture_final(&mut self, pixels: &[u8]) {
        if self.frames.last().is_none_or(|last| last != pixels) {
            self.frames.push(pixels.to_vec());
        }
    }

    /// Number of frames kept so far
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames offered in total, kept or not
    pub const fn offered(&self) -> usize {
        self.offered
    }

    /// Kept frames are one of every `skip_factor` offered
    pub const fn skip_factor(&self) -> usize {
        self.skip_factor
    }

    /// Export the captured frames as a GIF
    ///
    /// The last frame is repeated with a long delay so the finished result stays visible.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - A frame does not match the capture dimensions
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif<P: AsRef<Path>>(&self, output_path: P) -> Result<()> {
        let output_path = output_path.as_ref();
        if self.frames.is_empty() {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "No frames captured for visualization".to_string(),
            });
        }

        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        for pixels in &self.frames {
            frames.push(self.to_frame(pixels, self.delay_ms)?);
        }
        if let Some(last) = self.frames.last() {
            frames.push(self.to_frame(last, self.delay_ms * 25)?);
        }

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn to_frame(&self, pixels: &[u8], delay_ms: u32) -> Result<Frame> {
        let img = RgbaImage::from_raw(self.width, self.height, pixels.to_vec()).ok_or_else(|| {
            AlgorithmError::InvalidSourceData {
                reason: format!(
                    "frame of {} bytes does not match {}x{}",
                    pixels.len(),
                    self.width,
                    self.height
                ),
            }
        })?;
        Ok(Frame::from_parts(
            img,
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        ))
    }
}
