//! The output raster: a pre-allocated, row-major RGBA8 buffer that
//! can be carved into disjoint rows for the render workers.

use crate::errors::RenderError;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// A width x height RGBA8 image.
#[derive(Debug)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Allocates a zeroed framebuffer.  Fails, rather than aborting
    /// the process, if the size overflows or the allocator refuses.
    pub fn new(width: usize, height: usize) -> Result<Framebuffer, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::config(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let bytes = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(RenderError::Allocation { bytes: usize::max_value() })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| RenderError::Allocation { bytes })?;
        pixels.resize(bytes, 0);
        Ok(Framebuffer {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes in one row.
    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    /// The rows of the image, top to bottom, as disjoint mutable
    /// slices.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let stride = self.stride();
        self.pixels.chunks_mut(stride)
    }

    /// The RGBA quad at (x, y).
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        let at = y * self.stride() + x * CHANNELS;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[at..at + CHANNELS]);
        px
    }

    /// The raw bytes, ready for an encoder.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_cover_the_buffer() {
        let mut fb = Framebuffer::new(3, 5).unwrap();
        assert_eq!(fb.as_bytes().len(), 60);
        let rows: Vec<&mut [u8]> = fb.rows_mut().collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 12));
    }

    #[test]
    fn get_reads_back_writes() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        if let Some(row) = fb.rows_mut().nth(1) {
            row[4..8].copy_from_slice(&[1, 2, 3, 4]);
        }
        assert_eq!(fb.get(1, 1), [1, 2, 3, 4]);
        assert_eq!(fb.get(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn empty_images_are_a_config_error() {
        assert!(Framebuffer::new(0, 10).unwrap_err().is_config());
    }

    #[test]
    fn impossible_sizes_fail_cleanly() {
        match Framebuffer::new(usize::max_value(), 2) {
            Err(RenderError::Allocation { .. }) => {}
            other => panic!("expected allocation failure, got {:?}", other),
        }
    }
}
