//! Randomized recursive triangle subdivision.
//!
//! Repeatedly splitting random triangles and pushing the new vertex along
//! the face normal turns the smooth synthesized grids into jagged, rocky
//! surfaces. Each successful step replaces one triangle with three, so the
//! triangle count grows by 2 and the vertex count by 1 per step.

use crate::geometry::{triangle_area, triangle_normal};
use crate::Mesh;
use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Triangles with area below this are never split further.
///
/// Guards against runaway subdivision of slivers and against collinear
/// triangles whose normal is undefined.
pub const MIN_TRIANGLE_AREA: f32 = 1e-4;

/// Splits one randomly chosen triangle into three, displacing the new
/// interior vertex along the face normal.
///
/// The interior point is a 3:2:1 weighted average of the triangle's
/// vertices plus a small slot-derived jitter, which biases new points
/// toward the first vertex and keeps the subdivision pattern asymmetric.
/// The displacement is `bias * sqrt(area) * spike`, where `bias` is a
/// slot-derived scalar in `[-3, 11)` — mostly outward, occasionally inward.
///
/// Returns `true` if the mesh was changed. Returns `false` without touching
/// the mesh when it has no complete triangle or the chosen triangle is
/// smaller than [`MIN_TRIANGLE_AREA`]; callers simply try again on the next
/// attempt.
pub fn refine<R: Rng>(rng: &mut R, spike: f32, mesh: &mut Mesh) -> bool {
    let count = mesh.triangle_count();
    if count == 0 {
        return false;
    }

    let slot = rng.random_range(0..count);
    let [v1, v2, v3] = mesh.triangle(slot);
    let [a, b, c] = mesh.triangle_positions(slot);

    let area = triangle_area(a, b, c);
    if area < MIN_TRIANGLE_AREA {
        return false;
    }
    let normal = triangle_normal(a, b, c);

    let t = slot as f32 / count as f32;
    let bias = 14.0 * t - 3.0;
    let jitter = Vec3::splat(t);
    let mut point = (3.0 * a + 2.0 * b + c + jitter) / 6.0;
    point += normal * (bias * area.sqrt() * spike);

    mesh.swap_remove_triangle(slot);
    let new = mesh.push_vertex(point);

    // Replace each edge of the removed triangle, preserving winding.
    mesh.push_triangle(v1, v2, new);
    mesh.push_triangle(new, v2, v3);
    mesh.push_triangle(new, v3, v1);

    true
}

/// How the spike magnitude evolves across a refinement run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpikeSchedule {
    /// The same magnitude for every attempt.
    Constant(f32),
    /// Starts at `start` and is multiplied by `factor` after each attempt.
    Decay {
        /// Magnitude of the first attempt.
        start: f32,
        /// Per-attempt multiplier.
        factor: f32,
    },
    /// A fresh uniform draw in `[min, max]` for every attempt.
    Uniform {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
}

impl SpikeSchedule {
    fn next<R: Rng>(&self, rng: &mut R, attempt: usize) -> f32 {
        match *self {
            SpikeSchedule::Constant(spike) => spike,
            SpikeSchedule::Decay { start, factor } => start * factor.powi(attempt as i32),
            // Inclusive so equal bounds degrade to a constant spike.
            SpikeSchedule::Uniform { min, max } => rng.random_range(min..=max),
        }
    }
}

/// Runs a fixed number of [`refine`] attempts against the mesh.
///
/// Returns how many attempts structurally changed the mesh. Attempts that
/// hit a degenerate triangle are counted as tries but change nothing.
pub fn run_schedule<R: Rng>(
    rng: &mut R,
    iterations: usize,
    schedule: SpikeSchedule,
    mesh: &mut Mesh,
) -> usize {
    let mut applied = 0;
    for attempt in 0..iterations {
        let spike = schedule.next(rng, attempt);
        if refine(rng, spike, mesh) {
            applied += 1;
        }
    }
    applied
}
