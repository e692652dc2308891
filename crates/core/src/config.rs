//! Tunable constants of the particle field.
//!
//! Every policy value the simulation uses lives in [`FieldConfig`] so hosts
//! and tests can override it. Overrides arrive as a JSON object (CLI
//! `--params`, scene files) and are read with the [`params`](crate::params)
//! helpers: unknown keys are ignored, missing or mistyped keys keep their
//! defaults. [`FieldConfig::validate`] is the only place values are judged.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::SwarmError;
use crate::params::{param_f64, param_range, param_u8, param_usize};
use crate::particle::KineticRanges;

/// Default sampling stride in device pixels.
pub const DEFAULT_GAP: usize = 4;
/// Default alpha a sampled pixel must exceed to join the target field.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;
/// Default divisor applied to the canvas width to pick a font size.
pub const DEFAULT_FONT_DIVISOR: f64 = 4.0;
/// Default upper bound on the font size in pixels.
pub const DEFAULT_MAX_FONT_SIZE: f64 = 200.0;
/// Default fraction of the remaining distance covered per ordered tick.
pub const DEFAULT_CONVERGENCE: f64 = 0.05;
/// Default pointer repulsion radius in layout pixels.
pub const DEFAULT_REPULSION_RADIUS: f64 = 100.0;
/// Default pointer push per chaotic tick in layout pixels.
pub const DEFAULT_REPULSION_FORCE: f64 = 3.0;
/// Default particle opacity while ordered.
pub const DEFAULT_ORDERED_OPACITY: f64 = 0.8;
/// Default particle opacity while chaotic.
pub const DEFAULT_CHAOTIC_OPACITY: f64 = 0.4;
/// Default resize debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;
/// Resizes smaller than this on both axes (device pixels) are ignored.
pub const DEFAULT_RESIZE_TOLERANCE: f64 = 10.0;
/// Default index stride used when looking for link pairs.
pub const DEFAULT_LINK_STRIDE: usize = 10;
/// Default squared distance under which two sampled particles are linked.
pub const DEFAULT_LINK_DISTANCE_SQ: f64 = 900.0;

/// All tunables of the text-to-particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub gap: usize,
    pub alpha_threshold: u8,
    pub font_divisor: f64,
    pub max_font_size: f64,
    pub convergence: f64,
    pub repulsion_radius: f64,
    pub repulsion_force: f64,
    pub ordered_opacity: f64,
    pub chaotic_opacity: f64,
    pub debounce_ms: u64,
    pub resize_tolerance: f64,
    pub link_stride: usize,
    pub link_distance_sq: f64,
    pub kinetics: KineticRanges,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            font_divisor: DEFAULT_FONT_DIVISOR,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            convergence: DEFAULT_CONVERGENCE,
            repulsion_radius: DEFAULT_REPULSION_RADIUS,
            repulsion_force: DEFAULT_REPULSION_FORCE,
            ordered_opacity: DEFAULT_ORDERED_OPACITY,
            chaotic_opacity: DEFAULT_CHAOTIC_OPACITY,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            resize_tolerance: DEFAULT_RESIZE_TOLERANCE,
            link_stride: DEFAULT_LINK_STRIDE,
            link_distance_sq: DEFAULT_LINK_DISTANCE_SQ,
            kinetics: KineticRanges::default(),
        }
    }
}

impl FieldConfig {
    /// Reads overrides from a JSON object, falling back to defaults.
    ///
    /// Kinetic ranges are `[min, max]` arrays under `size_range`,
    /// `speed_range`, `angle_range` and `velocity_range`.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            gap: param_usize(params, "gap", d.gap),
            alpha_threshold: param_u8(params, "alpha_threshold", d.alpha_threshold),
            font_divisor: param_f64(params, "font_divisor", d.font_divisor),
            max_font_size: param_f64(params, "max_font_size", d.max_font_size),
            convergence: param_f64(params, "convergence", d.convergence),
            repulsion_radius: param_f64(params, "repulsion_radius", d.repulsion_radius),
            repulsion_force: param_f64(params, "repulsion_force", d.repulsion_force),
            ordered_opacity: param_f64(params, "ordered_opacity", d.ordered_opacity),
            chaotic_opacity: param_f64(params, "chaotic_opacity", d.chaotic_opacity),
            debounce_ms: param_usize(params, "debounce_ms", d.debounce_ms as usize) as u64,
            resize_tolerance: param_f64(params, "resize_tolerance", d.resize_tolerance),
            link_stride: param_usize(params, "link_stride", d.link_stride),
            link_distance_sq: param_f64(params, "link_distance_sq", d.link_distance_sq),
            kinetics: KineticRanges {
                size: param_range(params, "size_range", d.kinetics.size),
                speed: param_range(params, "speed_range", d.kinetics.speed),
                angle: param_range(params, "angle_range", d.kinetics.angle),
                velocity: param_range(params, "velocity_range", d.kinetics.velocity),
            },
        }
    }

    /// Current values, keyed the way [`from_json`](Self::from_json) reads them.
    pub fn to_json(&self) -> Value {
        json!({
            "gap": self.gap,
            "alpha_threshold": self.alpha_threshold,
            "font_divisor": self.font_divisor,
            "max_font_size": self.max_font_size,
            "convergence": self.convergence,
            "repulsion_radius": self.repulsion_radius,
            "repulsion_force": self.repulsion_force,
            "ordered_opacity": self.ordered_opacity,
            "chaotic_opacity": self.chaotic_opacity,
            "debounce_ms": self.debounce_ms,
            "resize_tolerance": self.resize_tolerance,
            "link_stride": self.link_stride,
            "link_distance_sq": self.link_distance_sq,
            "size_range": [self.kinetics.size.0, self.kinetics.size.1],
            "speed_range": [self.kinetics.speed.0, self.kinetics.speed.1],
            "angle_range": [self.kinetics.angle.0, self.kinetics.angle.1],
            "velocity_range": [self.kinetics.velocity.0, self.kinetics.velocity.1],
        })
    }

    /// Font size for a canvas of the given device width:
    /// `min(width / font_divisor, max_font_size)`.
    pub fn font_size(&self, width: usize) -> f64 {
        (width as f64 / self.font_divisor).min(self.max_font_size)
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.gap == 0 {
            return Err(SwarmError::invalid_param("gap", "must be at least 1"));
        }
        if self.link_stride == 0 {
            return Err(SwarmError::invalid_param("link_stride", "must be at least 1"));
        }
        positive("font_divisor", self.font_divisor)?;
        positive("max_font_size", self.max_font_size)?;
        if !(self.convergence > 0.0 && self.convergence <= 1.0) {
            return Err(SwarmError::invalid_param(
                "convergence",
                format!("must be in (0, 1], got {}", self.convergence),
            ));
        }
        non_negative("repulsion_radius", self.repulsion_radius)?;
        non_negative("repulsion_force", self.repulsion_force)?;
        non_negative("resize_tolerance", self.resize_tolerance)?;
        non_negative("link_distance_sq", self.link_distance_sq)?;
        unit("ordered_opacity", self.ordered_opacity)?;
        unit("chaotic_opacity", self.chaotic_opacity)?;
        ordered_range("size_range", self.kinetics.size)?;
        ordered_range("speed_range", self.kinetics.speed)?;
        ordered_range("angle_range", self.kinetics.angle)?;
        ordered_range("velocity_range", self.kinetics.velocity)?;
        Ok(())
    }

    /// Schema describing every key, its type, default and bounds.
    pub fn param_schema() -> Value {
        let d = Self::default();
        json!({
            "gap": {
                "type": "integer",
                "default": d.gap,
                "min": 1,
                "description": "Sampling stride in device pixels"
            },
            "alpha_threshold": {
                "type": "integer",
                "default": d.alpha_threshold,
                "min": 0,
                "max": 255,
                "description": "Sampled alpha must exceed this to become a target"
            },
            "font_divisor": {
                "type": "number",
                "default": d.font_divisor,
                "description": "Font size is canvas width divided by this, capped by max_font_size"
            },
            "max_font_size": {
                "type": "number",
                "default": d.max_font_size,
                "description": "Upper bound on the font size in pixels"
            },
            "convergence": {
                "type": "number",
                "default": d.convergence,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of the remaining distance to target covered per ordered tick"
            },
            "repulsion_radius": {
                "type": "number",
                "default": d.repulsion_radius,
                "min": 0.0,
                "description": "Pointer repulsion radius in layout pixels"
            },
            "repulsion_force": {
                "type": "number",
                "default": d.repulsion_force,
                "min": 0.0,
                "description": "Pointer push per chaotic tick in layout pixels"
            },
            "ordered_opacity": {
                "type": "number",
                "default": d.ordered_opacity,
                "min": 0.0,
                "max": 1.0,
                "description": "Particle opacity while ordered"
            },
            "chaotic_opacity": {
                "type": "number",
                "default": d.chaotic_opacity,
                "min": 0.0,
                "max": 1.0,
                "description": "Particle opacity while chaotic"
            },
            "debounce_ms": {
                "type": "integer",
                "default": d.debounce_ms,
                "min": 0,
                "description": "Quiet period before a resize is applied"
            },
            "resize_tolerance": {
                "type": "number",
                "default": d.resize_tolerance,
                "min": 0.0,
                "description": "Resizes below this on both axes (device pixels) are ignored"
            },
            "link_stride": {
                "type": "integer",
                "default": d.link_stride,
                "min": 1,
                "description": "Index stride of particles checked for links"
            },
            "link_distance_sq": {
                "type": "number",
                "default": d.link_distance_sq,
                "min": 0.0,
                "description": "Squared distance under which sampled particles are linked"
            },
            "size_range": {
                "type": "range",
                "default": [d.kinetics.size.0, d.kinetics.size.1],
                "description": "Particle radius range [min, max)"
            },
            "speed_range": {
                "type": "range",
                "default": [d.kinetics.speed.0, d.kinetics.speed.1],
                "description": "Heading increment per chaotic tick [min, max)"
            },
            "angle_range": {
                "type": "range",
                "default": [d.kinetics.angle.0, d.kinetics.angle.1],
                "description": "Initial heading range in radians [min, max)"
            },
            "velocity_range": {
                "type": "range",
                "default": [d.kinetics.velocity.0, d.kinetics.velocity.1],
                "description": "Chaotic speed along the heading [min, max)"
            }
        })
    }
}

fn positive(name: &str, v: f64) -> Result<(), SwarmError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SwarmError::invalid_param(name, format!("must be positive, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> Result<(), SwarmError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SwarmError::invalid_param(name, format!("must be non-negative, got {v}")))
    }
}

fn unit(name: &str, v: f64) -> Result<(), SwarmError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(SwarmError::invalid_param(name, format!("must be in [0, 1], got {v}")))
    }
}

fn ordered_range(name: &str, (lo, hi): (f64, f64)) -> Result<(), SwarmError> {
    if lo.is_finite() && hi.is_finite() && lo <= hi {
        Ok(())
    } else {
        Err(SwarmError::invalid_param(name, format!("expected min <= max, got [{lo}, {hi}]")))
    }
}
