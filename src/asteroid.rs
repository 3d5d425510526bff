//! Box-seeded asteroid meshes.
//!
//! Rocks do not start from a height-field grid; they start from a plain
//! box and rely entirely on heavy randomized subdivision to look natural.

use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::refine::{run_schedule, SpikeSchedule};
use crate::Mesh;

/// Corner signs of a box, ordered so [`BOX_TRIANGLES`] winds clockwise
/// toward the outside of every face.
const BOX_CORNERS: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
];

/// Two triangles per face: +x, -x, +y, -y, +z, -z.
const BOX_TRIANGLES: [[u32; 3]; 12] = [
    [0, 2, 1],
    [1, 2, 3],
    [7, 6, 5],
    [5, 6, 4],
    [0, 1, 4],
    [1, 5, 4],
    [7, 3, 6],
    [6, 3, 2],
    [0, 4, 2],
    [2, 4, 6],
    [7, 5, 3],
    [3, 5, 1],
];

/// Creates a box seed mesh centered at `center`.
///
/// Vertices are shared between faces; the subdivision pass wants connected
/// topology, not per-face normals.
pub fn box_seed(center: Vec3, half_extent: f32) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);
    for corner in BOX_CORNERS {
        mesh.push_vertex(center + Vec3::from_array(corner) * half_extent);
    }
    for [i0, i1, i2] in BOX_TRIANGLES {
        mesh.push_triangle(i0, i1, i2);
    }
    mesh
}

/// An irregular rock built by heavily subdividing a box seed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Asteroid {
    /// World-space center of the seed box.
    pub center: Vec3,
    /// Half the seed box edge length.
    pub half_extent: f32,
    /// Refinement attempts.
    pub divisions: usize,
    /// Lower bound of the per-attempt spike draw.
    pub spike_min: f32,
    /// Upper bound of the per-attempt spike draw.
    pub spike_max: f32,
}

impl Default for Asteroid {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            half_extent: 10.0,
            divisions: 2000,
            spike_min: 0.01,
            spike_max: 0.2,
        }
    }
}

impl Asteroid {
    /// Synthesizes the asteroid mesh.
    pub fn apply<R: Rng>(&self, rng: &mut R) -> Result<Mesh, ShapeError> {
        check_extent(self.half_extent)?;
        check_spikes(self.spike_min, self.spike_max)?;

        let mut mesh = box_seed(self.center, self.half_extent);
        run_schedule(
            rng,
            self.divisions,
            SpikeSchedule::Uniform {
                min: self.spike_min,
                max: self.spike_max,
            },
            &mut mesh,
        );
        Ok(mesh)
    }
}

fn check_extent(half_extent: f32) -> Result<(), ShapeError> {
    if half_extent < 0.0 {
        return Err(ShapeError::NegativeParameter {
            name: "half_extent",
            value: half_extent,
        });
    }
    Ok(())
}

fn check_spikes(min: f32, max: f32) -> Result<(), ShapeError> {
    if min < 0.0 {
        return Err(ShapeError::NegativeParameter {
            name: "spike_min",
            value: min,
        });
    }
    if max < min {
        return Err(ShapeError::InvertedRange {
            name: "spike",
            min,
            max,
        });
    }
    Ok(())
}
