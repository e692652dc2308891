//! The owned particle field: one swarm, its target field, and the resize
//! pipeline that feeds it.
//!
//! `SwarmField` is the only owner of the particle collection. Integration and
//! retargeting both take `&mut self`, so a retarget can never land in the
//! middle of a tick.

use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FieldConfig;
use crate::debounce::Debouncer;
use crate::integrate::{integrate, Extent, Mode};
use crate::links::links;
use crate::particle::{create_particles, Particle};
use crate::position::Position;
use crate::prng::RandomSource;
use crate::raster::{rasterize, TextSurface};
use crate::retarget::retarget;

/// Canvas dimensions in both coordinate spaces.
///
/// Targets are sampled in device pixels; spawn points and wraparound use
/// layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub device_width: usize,
    pub device_height: usize,
    pub layout_width: f64,
    pub layout_height: f64,
}

impl CanvasSize {
    /// Layout size times `pixel_ratio`, rounded to whole device pixels.
    pub fn from_layout(layout_width: f64, layout_height: f64, pixel_ratio: f64) -> Self {
        Self {
            device_width: (layout_width * pixel_ratio).round().max(0.0) as usize,
            device_height: (layout_height * pixel_ratio).round().max(0.0) as usize,
            layout_width,
            layout_height,
        }
    }

    fn extent(&self) -> Extent {
        Extent {
            width: self.layout_width,
            height: self.layout_height,
        }
    }
}

/// What a [`SwarmField::poll_resize`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// No resize was due.
    Idle,
    /// A resize fired but was within tolerance of the current size.
    Skipped,
    /// Targets were recomputed; `targets` is the new field's size.
    Retargeted { targets: usize },
    /// The field has been shut down.
    Stopped,
}

/// Read-only view of one frame for the host to draw.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub particles: &'a [Particle],
    pub opacity: f64,
    /// Linked index pairs; empty unless ordered.
    pub links: Vec<(usize, usize)>,
}

/// A swarm bound to a piece of text.
#[derive(Debug)]
pub struct SwarmField {
    text: String,
    config: FieldConfig,
    size: CanvasSize,
    particles: Vec<Particle>,
    targets: Vec<Position>,
    resize: Debouncer<CanvasSize>,
    running: bool,
}

impl SwarmField {
    /// Rasterizes `text` at the device size and builds one particle per
    /// sampled position, spawned in layout space.
    ///
    /// The swarm's size is fixed here. An empty initial field gives an empty
    /// swarm for the field's lifetime.
    pub fn new<S, R>(
        surface: &mut S,
        text: impl Into<String>,
        size: CanvasSize,
        config: FieldConfig,
        rng: &mut R,
    ) -> Self
    where
        S: TextSurface + ?Sized,
        R: RandomSource + ?Sized,
    {
        let text = text.into();
        let targets = rasterize(surface, size.device_width, size.device_height, &text, &config);
        let particles = create_particles(
            &targets,
            size.layout_width,
            size.layout_height,
            &config.kinetics,
            rng,
        );
        info!(
            text = %text,
            particles = particles.len(),
            width = size.device_width,
            height = size.device_height,
            "particle field initialized"
        );
        let resize = Debouncer::new(Duration::from_millis(config.debounce_ms));
        Self {
            text,
            config,
            size,
            particles,
            targets,
            resize,
            running: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The most recently rasterized target field.
    pub fn targets(&self) -> &[Position] {
        &self.targets
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a debounced resize is waiting to fire.
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Records a resize event. Bursts collapse; only the last size of a burst
    /// is applied, `debounce_ms` after it arrived.
    pub fn request_resize(&mut self, now: Duration, size: CanvasSize) {
        if self.running {
            self.resize.call(now, size);
        }
    }

    /// Applies a due resize: re-rasterizes at the new device size and
    /// retargets the existing swarm.
    ///
    /// A resize smaller than `resize_tolerance` on both device axes is
    /// dropped and leaves the recorded size alone.
    pub fn poll_resize<S: TextSurface + ?Sized>(
        &mut self,
        now: Duration,
        surface: &mut S,
    ) -> ResizeOutcome {
        if !self.running {
            return ResizeOutcome::Stopped;
        }
        let Some(next) = self.resize.poll(now) else {
            return ResizeOutcome::Idle;
        };

        let dw = (next.device_width as f64 - self.size.device_width as f64).abs();
        let dh = (next.device_height as f64 - self.size.device_height as f64).abs();
        let tol = self.config.resize_tolerance;
        if dw < tol && dh < tol {
            debug!(dw, dh, "resize within tolerance, ignored");
            return ResizeOutcome::Skipped;
        }

        let targets = rasterize(
            surface,
            next.device_width,
            next.device_height,
            &self.text,
            &self.config,
        );
        retarget(&mut self.particles, &targets);
        let count = targets.len();
        self.targets = targets;
        self.size = next;
        info!(
            width = next.device_width,
            height = next.device_height,
            targets = count,
            "field resized"
        );
        ResizeOutcome::Retargeted { targets: count }
    }

    /// Advances the swarm by one tick. `pointer` is in layout pixels relative
    /// to the field.
    pub fn tick(&mut self, mode: Mode, pointer: DVec2) {
        if !self.running {
            return;
        }
        integrate(
            &mut self.particles,
            mode,
            pointer,
            self.size.extent(),
            &self.config,
        );
    }

    /// What to draw for the current state.
    pub fn frame(&self, mode: Mode) -> Frame<'_> {
        let links = match mode {
            Mode::Ordered => links(
                &self.particles,
                self.config.link_stride,
                self.config.link_distance_sq,
            ),
            Mode::Chaotic => Vec::new(),
        };
        Frame {
            particles: &self.particles,
            opacity: mode.opacity(&self.config),
            links,
        }
    }

    /// Cancels any pending resize and stops ticking. Idempotent.
    pub fn shutdown(&mut self) {
        if self.running {
            self.resize.cancel();
            self.running = false;
            debug!("particle field shut down");
        }
    }

    /// Current configuration as JSON.
    pub fn params(&self) -> Value {
        self.config.to_json()
    }

    /// Schema of the configuration keys.
    pub fn param_schema(&self) -> Value {
        FieldConfig::param_schema()
    }
}
