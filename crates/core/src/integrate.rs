//! Per-tick integration of the swarm.
//!
//! Pure step functions with no timers: the host decides when a tick happens
//! and which [`Mode`] applies.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::particle::Particle;

/// Whether the swarm coheres into the text or disperses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Ordered,
    #[default]
    Chaotic,
}

impl Mode {
    /// Ordered when the field is in view or hovered.
    pub fn select(in_view: bool, hovering: bool) -> Self {
        if in_view || hovering {
            Mode::Ordered
        } else {
            Mode::Chaotic
        }
    }

    /// Particle fill opacity for this mode.
    pub fn opacity(self, config: &FieldConfig) -> f64 {
        match self {
            Mode::Ordered => config.ordered_opacity,
            Mode::Chaotic => config.chaotic_opacity,
        }
    }
}

/// Layout-space rectangle `[0, width] x [0, height]` chaotic particles wrap in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Advances every particle by one tick.
///
/// `pointer` is only consulted in chaotic mode.
pub fn integrate(
    particles: &mut [Particle],
    mode: Mode,
    pointer: DVec2,
    extent: Extent,
    config: &FieldConfig,
) {
    match mode {
        Mode::Ordered => particles
            .iter_mut()
            .for_each(|p| step_ordered(p, config.convergence)),
        Mode::Chaotic => particles
            .iter_mut()
            .for_each(|p| step_chaotic(p, pointer, extent, config)),
    }
}

/// Moves `fraction` of the way toward the target. Converges exponentially and
/// never lands exactly for `fraction < 1`.
pub fn step_ordered(p: &mut Particle, fraction: f64) {
    p.x += (p.target_x - p.x) * fraction;
    p.y += (p.target_y - p.y) * fraction;
}

/// Wanders along the heading, wraps at the extent, then yields to the pointer.
pub fn step_chaotic(p: &mut Particle, pointer: DVec2, extent: Extent, config: &FieldConfig) {
    p.angle += p.speed;
    p.x += p.angle.cos() * p.velocity;
    p.y += p.angle.sin() * p.velocity;

    p.x = wrap(p.x, extent.width);
    p.y = wrap(p.y, extent.height);

    let away = DVec2::new(p.x, p.y) - pointer;
    let dist_sq = away.length_squared();
    let radius = config.repulsion_radius;
    if dist_sq < radius * radius && dist_sq > 0.0 {
        let push = away / dist_sq.sqrt() * config.repulsion_force;
        p.x += push.x;
        p.y += push.y;
    }
}

/// Leaving one edge re-enters at the opposite one.
fn wrap(v: f64, max: f64) -> f64 {
    if v < 0.0 {
        max
    } else if v > max {
        0.0
    } else {
        v
    }
}
