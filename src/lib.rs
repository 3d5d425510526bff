//! Procedural terrain and rock mesh generation.
//!
//! Synthesizes coarse landscape meshes — mountains, volcanoes, blended
//! mountain ranges, ring tracks — from height-field grids, then roughens
//! them through randomized recursive triangle subdivision. Asteroid-style
//! rocks skip the grid and grow from a box seed instead.
//!
//! A build is synchronous and single-owner: one synthesizer populates a
//! fresh [`Mesh`], zero or more [`refine`] passes mutate it in place, and
//! [`Mesh::finalize`] recomputes normals for the hand-off to whatever
//! renders it. All randomness comes from a caller-supplied [`rand::Rng`],
//! so seeded builds replay exactly.
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use relief::{Landform, SpikeSchedule, Volcano};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let shape = Landform::Volcano(Volcano::default());
//! let mut mesh = shape.apply(&mut rng).unwrap();
//!
//! // Extra roughening on top of the shape's own refinement pass.
//! relief::run_schedule(&mut rng, 300, SpikeSchedule::Constant(0.02), &mut mesh);
//!
//! mesh.finalize();
//! assert!(mesh.has_normals());
//! assert!(mesh.indices_valid());
//! ```

mod asteroid;
mod error;
mod geometry;
mod heightfield;
mod mesh;
mod refine;

pub use asteroid::{box_seed, Asteroid};
pub use error::ShapeError;
pub use geometry::{triangle_area, triangle_normal};
pub use heightfield::{
    CurvedTrack, Landform, Mountain, MountainRange, PeakPoint, Volcano,
    DEFAULT_PEAK_INFLUENCE_SQ,
};
pub use mesh::{Mesh, MeshBuilder};
pub use refine::{refine, run_schedule, SpikeSchedule, MIN_TRIANGLE_AREA};
