//! PNG snapshots of a [`Frame`].
//!
//! Feature-gated behind `png` (default on) so embedders that only need the
//! pixel buffer do not pull in the `image` crate.

use std::path::Path;

use textswarm_core::{Frame, SwarmError};

use crate::pixel::{frame_to_rgba, RenderStyle};

/// Draws `frame` and writes it as a PNG.
///
/// Returns `SwarmError::InvalidDimensions` if the size does not fit in
/// `u32` or is zero, or `SwarmError::Io` on write failure.
pub fn write_png(
    frame: &Frame<'_>,
    width: usize,
    height: usize,
    scale: f64,
    style: &RenderStyle,
    path: &Path,
) -> Result<(), SwarmError> {
    if width == 0 || height == 0 {
        return Err(SwarmError::InvalidDimensions);
    }
    let w = u32::try_from(width).map_err(|_| SwarmError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| SwarmError::InvalidDimensions)?;
    let rgba = frame_to_rgba(frame, width, height, scale, style);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| SwarmError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SwarmError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use textswarm_core::Particle;

    #[test]
    fn write_png_round_trip() {
        let particles = [Particle {
            x: 8.0,
            y: 8.0,
            target_x: 8.0,
            target_y: 8.0,
            origin_x: 0.0,
            origin_y: 0.0,
            size: 3.0,
            speed: 0.01,
            angle: 0.0,
            velocity: 1.0,
        }];
        let frame = Frame {
            particles: &particles,
            opacity: 1.0,
            links: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&frame, 16, 16, 1.0, &RenderStyle::default(), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (16, 16));
        assert_eq!(img.get_pixel(8, 8).0, [255, 255, 255, 255]);
    }

    #[test]
    fn zero_size_is_rejected() {
        let frame = Frame {
            particles: &[],
            opacity: 1.0,
            links: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let err = write_png(&frame, 0, 4, 1.0, &RenderStyle::default(), &dir.path().join("x.png"));
        assert!(matches!(err, Err(SwarmError::InvalidDimensions)));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let frame = Frame {
            particles: &[],
            opacity: 1.0,
            links: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let err = write_png(&frame, 4, 4, 1.0, &RenderStyle::default(), &path);
        assert!(matches!(err, Err(SwarmError::Io(_))));
    }
}
