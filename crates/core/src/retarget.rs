//! Reconciling a new target field into an existing swarm.

use tracing::debug;

use crate::particle::Particle;
use crate::position::Position;

/// Reassigns particle targets to `new_positions` in place.
///
/// * Either side empty: nothing changes.
/// * `particles.len() <= new_positions.len()`: particle `i` takes
///   `new_positions[i]`; trailing positions go unused.
/// * Otherwise positions are reused cyclically, particle `i` taking
///   `new_positions[i % new_positions.len()]`, so several particles share a
///   destination.
///
/// Positions, kinetics and particle count are never touched.
pub fn retarget(particles: &mut [Particle], new_positions: &[Position]) {
    if particles.is_empty() || new_positions.is_empty() {
        debug!(
            particles = particles.len(),
            positions = new_positions.len(),
            "retarget skipped"
        );
        return;
    }

    // The cyclic index is the identity when there are enough positions.
    let n = new_positions.len();
    for (i, particle) in particles.iter_mut().enumerate() {
        particle.set_target(new_positions[i % n]);
    }

    debug!(
        particles = particles.len(),
        positions = n,
        shared = particles.len() > n,
        "retargeted swarm"
    );
}
