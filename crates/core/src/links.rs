//! Connection lines between nearby particles of an ordered swarm.

use crate::particle::Particle;

/// Index pairs `(i, j)` of linked particles, `i < j`.
///
/// Only every `stride`-th particle takes part (indices `0, stride, 2*stride,
/// ...`), keeping the pairwise check cheap; a pair is linked when its squared
/// distance is strictly below `max_distance_sq`. A stride of 0 is treated as 1.
pub fn links(particles: &[Particle], stride: usize, max_distance_sq: f64) -> Vec<(usize, usize)> {
    let stride = stride.max(1);
    let mut out = Vec::new();
    for i in (0..particles.len()).step_by(stride) {
        let a = &particles[i];
        for j in (i + stride..particles.len()).step_by(stride) {
            let b = &particles[j];
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            if dx * dx + dy * dy < max_distance_sq {
                out.push((i, j));
            }
        }
    }
    out
}
