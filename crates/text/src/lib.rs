#![deny(unsafe_code)]
//! Font-backed [`TextSurface`] for textswarm.
//!
//! Shapes text with `cosmic-text` and stamps the glyph coverage bitmaps from
//! its swash cache into an [`AlphaMask`]. Fonts come from the system font
//! database unless a prepared [`FontSystem`] is supplied.

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, SwashImage,
    Weight, Wrap,
};
use textswarm_core::{AlphaMask, TextSurface};
use tracing::{debug, warn};

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// A [`TextSurface`] that renders bold text with real fonts.
pub struct CosmicSurface {
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: Option<String>,
}

impl CosmicSurface {
    /// Loads the system fonts. This scans the font directories, so build one
    /// surface and reuse it across resizes.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            family: None,
        }
    }

    /// Prefers the named family, falling back through the font system's
    /// usual sans-serif chain when it is missing.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Number of font faces available to the surface.
    pub fn face_count(&self) -> usize {
        self.font_system.db().faces().count()
    }
}

impl Default for CosmicSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSurface for CosmicSurface {
    fn render(
        &mut self,
        text: &str,
        width: usize,
        height: usize,
        font_size: f64,
    ) -> Option<AlphaMask> {
        // cosmic-text panics on a zero line height.
        let size = font_size as f32;
        if !(size.is_finite() && size > 0.0) {
            warn!(font_size, "unusable font size for text surface");
            return None;
        }
        if self.font_system.db().faces().next().is_none() {
            warn!("no fonts available for text surface");
            return None;
        }
        let mut mask = AlphaMask::new(width, height).ok()?;

        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * LINE_HEIGHT));
        buffer.set_wrap(&mut self.font_system, Wrap::None);
        buffer.set_size(&mut self.font_system, None, None);
        let family = match &self.family {
            Some(name) => Family::Name(name),
            None => Family::SansSerif,
        };
        let attrs = Attrs::new().family(family).weight(Weight::BOLD);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let baseline = height as f32 / 2.0;
        let mut stamped = 0usize;
        for run in buffer.layout_runs() {
            let left = width as f32 / 2.0 - run.line_w / 2.0;
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((left, baseline), 1.0);
                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                stamp(&mut mask, image, physical.x, physical.y);
                stamped += 1;
            }
        }
        debug!(text, font_size, glyphs = stamped, "rendered text surface");
        Some(mask)
    }
}

/// Copies a glyph's coverage into `mask` with its origin at `(x, y)`.
fn stamp(mask: &mut AlphaMask, image: &SwashImage, x: i32, y: i32) {
    let p = image.placement;
    let left = i64::from(x) + i64::from(p.left);
    let top = i64::from(y) - i64::from(p.top);
    let w = p.width as usize;
    for row in 0..p.height as usize {
        for col in 0..w {
            let alpha = coverage(image, row * w + col);
            if alpha > 0 {
                mask.blend_max(left + col as i64, top + row as i64, alpha);
            }
        }
    }
}

/// Alpha of pixel `i` for each swash bitmap layout.
fn coverage(image: &SwashImage, i: usize) -> u8 {
    let data = &image.data;
    match image.content {
        SwashContent::Mask => data.get(i).copied().unwrap_or(0),
        SwashContent::Color => data.get(i * 4 + 3).copied().unwrap_or(0),
        SwashContent::SubpixelMask => data
            .get(i * 4..i * 4 + 3)
            .and_then(|rgb| rgb.iter().copied().max())
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_text::fontdb;
    use textswarm_core::{bounds, rasterize, CanvasSize, FieldConfig, SwarmField, Xorshift64};

    fn empty_surface() -> CosmicSurface {
        CosmicSurface::with_font_system(FontSystem::new_with_locale_and_db(
            "en-US".to_string(),
            fontdb::Database::new(),
        ))
    }

    #[test]
    fn no_fonts_means_no_surface() {
        let mut surface = empty_surface();
        assert_eq!(surface.face_count(), 0);
        assert!(surface.render("SOLACE", 400, 200, 100.0).is_none());
    }

    #[test]
    fn no_fonts_rasterizes_to_empty_field() {
        let mut surface = empty_surface();
        let positions = rasterize(&mut surface, 400, 200, "SOLACE", &FieldConfig::default());
        assert!(positions.is_empty());
    }

    #[test]
    fn zero_sized_canvas_has_no_surface() {
        let mut surface = empty_surface().with_family("Syne");
        assert!(surface.render("A", 0, 10, 10.0).is_none());
    }

    #[test]
    fn system_fonts_render_into_requested_dimensions() {
        let mut surface = CosmicSurface::new();
        if surface.face_count() == 0 {
            // Headless machines may have no fonts installed at all.
            return;
        }
        let mask = surface.render("SOLACE", 320, 160, 80.0).unwrap();
        assert_eq!((mask.width(), mask.height()), (320, 160));
    }

    #[test]
    fn glyphs_sit_on_the_baseline_and_are_centered() {
        let mut surface = CosmicSurface::new();
        if surface.face_count() == 0 {
            return;
        }
        let cfg = FieldConfig::default();
        let positions = rasterize(&mut surface, 1600, 400, "HI", &cfg);
        assert!(!positions.is_empty());

        let b = bounds(&positions).unwrap();
        // Baseline is at height / 2 and neither letter has a descender.
        assert!(b.max_y <= 200.0, "glyphs below baseline: {b:?}");
        assert!(b.min_y < 200.0 - cfg.font_size(1600) / 2.0, "glyphs too short: {b:?}");

        let center = (b.min_x + b.max_x) / 2.0;
        let slack = 3.0 * cfg.gap as f64;
        assert!((center - 800.0).abs() <= slack, "center {center}, bounds {b:?}");
    }

    #[test]
    fn unusable_font_size_has_no_surface() {
        let mut surface = CosmicSurface::new();
        assert!(surface.render("SOLACE", 400, 200, 0.0).is_none());
        assert!(surface.render("SOLACE", 400, 200, -3.0).is_none());
        assert!(surface.render("SOLACE", 400, 200, f64::INFINITY).is_none());
        assert!(surface.render("SOLACE", 400, 200, f64::NAN).is_none());
    }

    #[test]
    fn zero_font_cap_builds_an_empty_field() {
        let mut cfg = FieldConfig::default();
        cfg.max_font_size = 0.0;
        let field = SwarmField::new(
            &mut CosmicSurface::new(),
            "SOLACE",
            CanvasSize::from_layout(400.0, 200.0, 1.0),
            cfg,
            &mut Xorshift64::new(42),
        );
        assert!(field.particles().is_empty());
        assert!(field.targets().is_empty());
    }

    #[test]
    fn coverage_reads_each_bitmap_layout() {
        let mut image = SwashImage::new();
        image.data = vec![10, 20, 30, 40, 50, 60, 70, 80];

        image.content = SwashContent::Mask;
        assert_eq!(coverage(&image, 1), 20);

        image.content = SwashContent::Color;
        assert_eq!(coverage(&image, 1), 80);

        image.content = SwashContent::SubpixelMask;
        assert_eq!(coverage(&image, 0), 30);
        assert_eq!(coverage(&image, 5), 0);
    }
}
