//! Pure-computation rasterization of a [`Frame`] into an RGBA8 buffer.
//!
//! Always available (no feature gate) so hosts that blit their own pixels
//! can share it with the `png` snapshot path. Particles are drawn first as
//! filled circles, links on top as one-pixel lines, both alpha-blended.

use textswarm_core::Frame;

/// Colors used when drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: [u8; 3],
    pub particle: [u8; 3],
    pub link: [u8; 3],
    /// Opacity of link lines.
    pub link_alpha: f64,
}

impl Default for RenderStyle {
    /// White particles and links on near-black.
    fn default() -> Self {
        Self {
            background: [10, 10, 10],
            particle: [255, 255, 255],
            link: [255, 255, 255],
            link_alpha: 0.05,
        }
    }
}

/// Draws `frame` into a `width * height * 4` RGBA buffer.
///
/// Particle coordinates are multiplied by `scale` (the pixel ratio) before
/// drawing, mirroring a context scaled to device pixels.
pub fn frame_to_rgba(
    frame: &Frame<'_>,
    width: usize,
    height: usize,
    scale: f64,
    style: &RenderStyle,
) -> Vec<u8> {
    let mut canvas = Canvas::new(width, height, style.background);

    for p in frame.particles {
        canvas.fill_circle(
            p.x * scale,
            p.y * scale,
            p.size * scale,
            style.particle,
            frame.opacity,
        );
    }

    for &(i, j) in &frame.links {
        let (Some(a), Some(b)) = (frame.particles.get(i), frame.particles.get(j)) else {
            continue;
        };
        canvas.line(
            (a.x * scale, a.y * scale),
            (b.x * scale, b.y * scale),
            style.link,
            style.link_alpha,
        );
    }

    canvas.data
}

struct Canvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, height: usize, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        Self {
            width,
            height,
            data: [r, g, b, 255].repeat(width * height),
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        for (dst, &src) in self.data[idx..idx + 3].iter_mut().zip(&color) {
            *dst = (f64::from(*dst) * (1.0 - a) + f64::from(src) * a).round() as u8;
        }
    }

    /// Fills pixels whose centers lie within `r` of `(cx, cy)`.
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: [u8; 3], alpha: f64) {
        if !(cx.is_finite() && cy.is_finite() && r > 0.0) {
            return;
        }
        let r_sq = r * r;
        let x0 = (cx - r).floor().max(0.0) as i64;
        let y0 = (cy - r).floor().max(0.0) as i64;
        let x1 = ((cx + r).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((cy + r).ceil() as i64).min(self.height as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// DDA line, one blend per step.
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: [u8; 3], alpha: f64) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let n = steps.max(1.0) as i64;
        for k in 0..=n {
            let t = k as f64 / n as f64;
            let x = (from.0 + dx * t).floor() as i64;
            let y = (from.1 + dy * t).floor() as i64;
            self.blend(x, y, color, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textswarm_core::Particle;

    fn at(x: f64, y: f64, size: f64) -> Particle {
        Particle {
            x,
            y,
            target_x: x,
            target_y: y,
            origin_x: 0.0,
            origin_y: 0.0,
            size,
            speed: 0.01,
            angle: 0.0,
            velocity: 1.0,
        }
    }

    fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let i = (y * width + x) * 4;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn buffer_has_rgba_length_and_opaque_background() {
        let frame = Frame {
            particles: &[],
            opacity: 0.8,
            links: Vec::new(),
        };
        let buf = frame_to_rgba(&frame, 8, 4, 1.0, &RenderStyle::default());
        assert_eq!(buf.len(), 8 * 4 * 4);
        for chunk in buf.chunks(4) {
            assert_eq!(chunk, &[10, 10, 10, 255]);
        }
    }

    #[test]
    fn particle_blends_at_frame_opacity() {
        let particles = [at(5.0, 5.0, 2.0)];
        let frame = Frame {
            particles: &particles,
            opacity: 0.5,
            links: Vec::new(),
        };
        let style = RenderStyle {
            background: [0, 0, 0],
            ..RenderStyle::default()
        };
        let buf = frame_to_rgba(&frame, 10, 10, 1.0, &style);
        // 0 * 0.5 + 255 * 0.5 rounds to 128.
        assert_eq!(pixel(&buf, 10, 5, 5), [128, 128, 128, 255]);
        assert_eq!(pixel(&buf, 10, 0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn scale_moves_and_grows_particles() {
        let particles = [at(2.0, 2.0, 1.0)];
        let frame = Frame {
            particles: &particles,
            opacity: 1.0,
            links: Vec::new(),
        };
        let style = RenderStyle {
            background: [0, 0, 0],
            ..RenderStyle::default()
        };
        let buf = frame_to_rgba(&frame, 10, 10, 2.0, &style);
        assert_eq!(pixel(&buf, 10, 4, 4), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 10, 2, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn particles_off_canvas_are_clipped() {
        let particles = [at(-50.0, 3.0, 2.0), at(500.0, 500.0, 3.0), at(f64::NAN, 1.0, 1.0)];
        let frame = Frame {
            particles: &particles,
            opacity: 1.0,
            links: Vec::new(),
        };
        let buf = frame_to_rgba(&frame, 6, 6, 1.0, &RenderStyle::default());
        assert!(buf.chunks(4).all(|c| c == [10, 10, 10, 255]));
    }

    #[test]
    fn links_draw_between_particles() {
        let particles = [at(1.0, 5.0, 0.1), at(18.0, 5.0, 0.1)];
        let style = RenderStyle {
            background: [0, 0, 0],
            link_alpha: 1.0,
            ..RenderStyle::default()
        };
        let frame = Frame {
            particles: &particles,
            opacity: 0.0,
            links: vec![(0, 1), (0, 7)],
        };
        let buf = frame_to_rgba(&frame, 20, 10, 1.0, &style);
        assert_eq!(pixel(&buf, 20, 10, 5), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 20, 10, 2), [0, 0, 0, 255]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_particles_keep_buffer_shape_and_alpha(
                coords in proptest::collection::vec((-100.0f64..300.0, -100.0f64..300.0, 0.0f64..5.0), 0..50),
                w in 1usize..64,
                h in 1usize..64,
                scale in 0.5f64..3.0,
            ) {
                let particles: Vec<Particle> = coords.iter().map(|&(x, y, s)| at(x, y, s)).collect();
                let links = if particles.len() > 1 { vec![(0, particles.len() - 1)] } else { Vec::new() };
                let frame = Frame { particles: &particles, opacity: 0.8, links };
                let buf = frame_to_rgba(&frame, w, h, scale, &RenderStyle::default());
                prop_assert_eq!(buf.len(), w * h * 4);
                prop_assert!(buf.chunks(4).all(|c| c[3] == 255));
            }
        }
    }
}
