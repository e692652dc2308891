//! Text rasterization into a target field.
//!
//! A [`TextSurface`] draws the text into an [`AlphaMask`]; [`sample_mask`]
//! walks that mask on a `gap`-pixel grid and keeps every cell that is more
//! than half opaque. Font rendering is external, so the surface is a trait:
//! `textswarm-text` provides a real font stack, [`BlockSurface`] a
//! deterministic stand-in.

use tracing::{debug, warn};

use crate::config::FieldConfig;
use crate::mask::AlphaMask;
use crate::position::Position;

/// Something that can draw text into an offscreen alpha buffer.
pub trait TextSurface {
    /// Draws `text` in a bold face at `font_size` pixels, horizontally
    /// centered on `width / 2` with its baseline on `height / 2`.
    ///
    /// Returns `None` when no drawing surface can be acquired.
    fn render(&mut self, text: &str, width: usize, height: usize, font_size: f64)
        -> Option<AlphaMask>;
}

/// Block-glyph surface: every non-whitespace character is a solid box.
///
/// Boxes are `0.5 * font_size` wide and `0.7 * font_size` tall (sitting on
/// the baseline) on a `0.6 * font_size` advance. Output depends only on the
/// inputs, which makes it useful for tests and headless previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockSurface;

impl BlockSurface {
    const ADVANCE: f64 = 0.6;
    const GLYPH_WIDTH: f64 = 0.5;
    const CAP_HEIGHT: f64 = 0.7;
}

impl TextSurface for BlockSurface {
    fn render(
        &mut self,
        text: &str,
        width: usize,
        height: usize,
        font_size: f64,
    ) -> Option<AlphaMask> {
        let mut mask = AlphaMask::new(width, height).ok()?;
        let advance = font_size * Self::ADVANCE;
        let glyph_w = font_size * Self::GLYPH_WIDTH;
        let line_w = advance * text.chars().count() as f64;
        let left = width as f64 / 2.0 - line_w / 2.0;
        let baseline = height as f64 / 2.0;
        let top = baseline - font_size * Self::CAP_HEIGHT;

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x0 = left + i as f64 * advance + (advance - glyph_w) / 2.0;
            mask.fill_rect(
                x0.round() as i64,
                top.round() as i64,
                (x0 + glyph_w).round() as i64,
                baseline.round() as i64,
                255,
            );
        }
        Some(mask)
    }
}

/// Samples `mask` every `gap` pixels in row-major order, keeping cells whose
/// alpha is strictly above `threshold`. A `gap` of 0 is treated as 1.
pub fn sample_mask(mask: &AlphaMask, gap: usize, threshold: u8) -> Vec<Position> {
    let gap = gap.max(1);
    let w = mask.width();
    let data = mask.data();
    let mut out = Vec::new();
    for y in (0..mask.height()).step_by(gap) {
        for x in (0..w).step_by(gap) {
            if data[y * w + x] > threshold {
                out.push(Position::new(x as f64, y as f64));
            }
        }
    }
    out
}

/// Renders `text` on a `width` x `height` device canvas and returns its
/// target field.
///
/// Font size is `config.font_size(width)`. Empty text, a zero dimension, a
/// font size that is not a positive finite number, or a surface that cannot
/// draw all yield an empty field; callers treat that as "no shape available".
pub fn rasterize<S: TextSurface + ?Sized>(
    surface: &mut S,
    width: usize,
    height: usize,
    text: &str,
    config: &FieldConfig,
) -> Vec<Position> {
    if width == 0 || height == 0 || text.is_empty() {
        debug!(width, height, "nothing to rasterize");
        return Vec::new();
    }
    let font_size = config.font_size(width);
    if !(font_size.is_finite() && font_size > 0.0) {
        warn!(font_size, "unusable font size, nothing to rasterize");
        return Vec::new();
    }
    let Some(mask) = surface.render(text, width, height, font_size) else {
        warn!(width, height, "no drawing surface available");
        return Vec::new();
    };
    let positions = sample_mask(&mask, config.gap, config.alpha_threshold);
    debug!(
        width,
        height,
        font_size,
        gap = config.gap,
        targets = positions.len(),
        "rasterized text"
    );
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::bounds;

    struct NoSurface;

    impl TextSurface for NoSurface {
        fn render(&mut self, _: &str, _: usize, _: usize, _: f64) -> Option<AlphaMask> {
            None
        }
    }

    #[test]
    fn block_glyphs_sample_to_known_shape() {
        // 400 wide -> font 100, advance 60, boxes [145,195) and [205,255) x [30,100).
        let cfg = FieldConfig::default();
        let positions = rasterize(&mut BlockSurface, 400, 200, "AB", &cfg);
        assert_eq!(positions.len(), 2 * 12 * 17);
        let b = bounds(&positions).unwrap();
        assert_eq!((b.min_x, b.max_x), (148.0, 252.0));
        assert_eq!((b.min_y, b.max_y), (32.0, 96.0));
    }

    #[test]
    fn repeated_calls_are_stable() {
        let cfg = FieldConfig::default();
        let a = rasterize(&mut BlockSurface, 640, 360, "SOLACE", &cfg);
        let b = rasterize(&mut BlockSurface, 640, 360, "SOLACE", &cfg);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_row_major() {
        let cfg = FieldConfig::default();
        let positions = rasterize(&mut BlockSurface, 500, 300, "HI", &cfg);
        for pair in positions.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            assert!(p.y < q.y || (p.y == q.y && p.x < q.x), "{p:?} before {q:?}");
        }
    }

    #[test]
    fn samples_lie_on_the_gap_grid() {
        let mut cfg = FieldConfig::default();
        cfg.gap = 6;
        let positions = rasterize(&mut BlockSurface, 600, 300, "X", &cfg);
        assert!(!positions.is_empty());
        assert!(positions
            .iter()
            .all(|p| p.x as usize % 6 == 0 && p.y as usize % 6 == 0));
    }

    #[test]
    fn font_size_caps_at_200() {
        let cfg = FieldConfig::default();
        // At 2000 px the font would be 500 without the cap; glyph height is 0.7 * 200.
        let positions = rasterize(&mut BlockSurface, 2000, 1000, "I", &cfg);
        let b = bounds(&positions).unwrap();
        assert!(b.height() <= 140.0, "height {}", b.height());
        assert!(b.height() >= 130.0, "height {}", b.height());
    }

    #[test]
    fn threshold_is_strictly_greater() {
        let mut mask = AlphaMask::new(8, 8).unwrap();
        mask.set(0, 0, 128);
        mask.set(4, 0, 129);
        mask.set(4, 4, 255);
        let positions = sample_mask(&mask, 4, 128);
        assert_eq!(positions, vec![Position::new(4.0, 0.0), Position::new(4.0, 4.0)]);
    }

    #[test]
    fn off_grid_pixels_are_not_sampled() {
        let mut mask = AlphaMask::new(8, 8).unwrap();
        mask.set(1, 1, 255);
        assert!(sample_mask(&mask, 4, 128).is_empty());
        assert_eq!(sample_mask(&mask, 1, 128), vec![Position::new(1.0, 1.0)]);
    }

    #[test]
    fn zero_gap_is_treated_as_one() {
        let mask = AlphaMask::from_data(2, 2, vec![255; 4]).unwrap();
        assert_eq!(sample_mask(&mask, 0, 128).len(), 4);
    }

    #[test]
    fn missing_surface_yields_empty_field() {
        let cfg = FieldConfig::default();
        assert!(rasterize(&mut NoSurface, 400, 200, "SOLACE", &cfg).is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_empty_field() {
        let cfg = FieldConfig::default();
        assert!(rasterize(&mut BlockSurface, 0, 200, "A", &cfg).is_empty());
        assert!(rasterize(&mut BlockSurface, 200, 0, "A", &cfg).is_empty());
        assert!(rasterize(&mut BlockSurface, 200, 200, "", &cfg).is_empty());
        assert!(rasterize(&mut BlockSurface, 200, 200, "   ", &cfg).is_empty());
    }

    #[test]
    fn unusable_font_size_never_reaches_the_surface() {
        struct Refuses;
        impl TextSurface for Refuses {
            fn render(&mut self, _: &str, _: usize, _: usize, size: f64) -> Option<AlphaMask> {
                panic!("surface asked to draw at font size {size}");
            }
        }

        let mut zero_cap = FieldConfig::default();
        zero_cap.max_font_size = 0.0;
        assert!(rasterize(&mut Refuses, 400, 200, "SOLACE", &zero_cap).is_empty());

        let mut infinite = FieldConfig::default();
        infinite.font_divisor = f64::INFINITY;
        assert!(rasterize(&mut Refuses, 400, 200, "SOLACE", &infinite).is_empty());
    }

    #[test]
    fn surface_is_usable_as_trait_object() {
        let cfg = FieldConfig::default();
        let surface: &mut dyn TextSurface = &mut BlockSurface;
        assert!(!rasterize(surface, 400, 200, "A", &cfg).is_empty());
    }
}
