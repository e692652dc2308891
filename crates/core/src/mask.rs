//! Offscreen 8-bit coverage buffer produced by a [`TextSurface`](crate::raster::TextSurface).
//!
//! An `AlphaMask` stores `width * height` alpha values in row-major layout.
//! Unlike a canvas, reads outside the buffer are not errors: they read as
//! fully transparent, which is what the sampler wants at the edges.

use crate::error::SwarmError;

/// A row-major alpha buffer. 0 is transparent, 255 fully opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Creates a fully transparent mask.
    ///
    /// Returns `SwarmError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, SwarmError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wraps a pre-rendered buffer, validating `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SwarmError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(SwarmError::BufferMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the row-major alpha data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Alpha at `(x, y)`, or 0 outside the mask.
    pub fn get(&self, x: i64, y: i64) -> u8 {
        match self.index(x, y) {
            Some(idx) => self.data[idx],
            None => 0,
        }
    }

    /// Writes alpha at `(x, y)`; writes outside the mask are dropped.
    pub fn set(&mut self, x: i64, y: i64, alpha: u8) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = alpha;
        }
    }

    /// Writes `alpha` at `(x, y)` unless the pixel is already more opaque.
    /// Glyph bitmaps overlap at kerning pairs, so surfaces stamp with this.
    pub fn blend_max(&mut self, x: i64, y: i64, alpha: u8) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = self.data[idx].max(alpha);
        }
    }

    /// Fills the axis-aligned rectangle `[x0, x1) x [y0, y1)`, clipped to
    /// the mask.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, alpha: u8) {
        let xs = x0.max(0)..x1.min(self.width as i64);
        let ys = y0.max(0)..y1.min(self.height as i64);
        for y in ys {
            for x in xs.clone() {
                self.blend_max(x, y, alpha);
            }
        }
    }

    /// Number of pixels with alpha strictly above `threshold`.
    pub fn coverage(&self, threshold: u8) -> usize {
        self.data.iter().filter(|&&a| a > threshold).count()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, SwarmError> {
    if width == 0 || height == 0 {
        return Err(SwarmError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(SwarmError::InvalidDimensions)
}
