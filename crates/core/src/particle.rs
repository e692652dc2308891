//! Particles and their construction from a target field.
//!
//! A particle's kinetic personality (`size`, `speed`, `velocity`) is rolled
//! once at creation and never changes. Only its target moves, through
//! [`retarget`](crate::retarget::retarget).

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::position::Position;
use crate::prng::RandomSource;

/// A point mass drawn as a filled circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Current position, mutated every tick.
    pub x: f64,
    pub y: f64,
    /// Destination while ordered.
    pub target_x: f64,
    pub target_y: f64,
    /// Random spawn point recorded at creation.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Radius.
    pub size: f64,
    /// Heading increment per chaotic tick.
    pub speed: f64,
    /// Current heading in radians; unbounded.
    pub angle: f64,
    /// Distance travelled along the heading per chaotic tick.
    pub velocity: f64,
}

impl Particle {
    /// The particle's current destination.
    pub fn target(&self) -> Position {
        Position::new(self.target_x, self.target_y)
    }

    /// Distance from the current position to the target.
    pub fn distance_to_target(&self) -> f64 {
        (self.target_x - self.x).hypot(self.target_y - self.y)
    }

    pub(crate) fn set_target(&mut self, p: Position) {
        self.target_x = p.x;
        self.target_y = p.y;
    }
}

/// Half-open `[min, max)` ranges the kinetic fields are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticRanges {
    pub size: (f64, f64),
    pub speed: (f64, f64),
    pub angle: (f64, f64),
    pub velocity: (f64, f64),
}

impl Default for KineticRanges {
    fn default() -> Self {
        Self {
            size: (1.0, 3.0),
            speed: (0.01, 0.03),
            angle: (0.0, TAU),
            velocity: (1.0, 3.0),
        }
    }
}

/// Builds one particle per position.
///
/// `width` and `height` are the layout (CSS) dimensions of the canvas; they
/// only bound the random spawn and origin points. Targets are copied from
/// `positions` unchanged, so the output has exactly `positions.len()`
/// particles in the same order.
pub fn create_particles<R: RandomSource + ?Sized>(
    positions: &[Position],
    width: f64,
    height: f64,
    kinetics: &KineticRanges,
    rng: &mut R,
) -> Vec<Particle> {
    let particles: Vec<Particle> = positions
        .iter()
        .map(|pos| {
            let x = rng.next_range(0.0, width);
            let y = rng.next_range(0.0, height);
            let origin_x = rng.next_range(0.0, width);
            let origin_y = rng.next_range(0.0, height);
            Particle {
                x,
                y,
                target_x: pos.x,
                target_y: pos.y,
                origin_x,
                origin_y,
                size: rng.next_range(kinetics.size.0, kinetics.size.1),
                speed: rng.next_range(kinetics.speed.0, kinetics.speed.1),
                angle: rng.next_range(kinetics.angle.0, kinetics.angle.1),
                velocity: rng.next_range(kinetics.velocity.0, kinetics.velocity.1),
            }
        })
        .collect();
    debug!(count = particles.len(), width, height, "created particles");
    particles
}
