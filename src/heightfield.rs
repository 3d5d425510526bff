//! Height-field terrain synthesis.
//!
//! Each synthesizer fills a `length x length` grid of samples, placing the
//! vertex for `(i, j)` at `(origin.x + i, height(i, j), origin.y + j)`, and
//! shares one triangulation scheme that splits every interior grid quad
//! into two clockwise-wound triangles. The height function is the only
//! thing distinguishing the shapes; the ring track ignores height entirely
//! and bends the grid around a center instead.
//!
//! Shape parameters are plain structs with an `apply` method returning a
//! fresh [`Mesh`]; [`Landform`] is the tagged selection over all of them.
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use relief::Mountain;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mesh = Mountain {
//!     length: 16,
//!     divisions: 200,
//!     ..Default::default()
//! }
//! .apply(&mut rng)
//! .unwrap();
//! assert!(mesh.indices_valid());
//! ```

use glam::{Vec2, Vec3};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::error::ShapeError;
use crate::refine::{run_schedule, SpikeSchedule};
use crate::Mesh;

/// Default squared-distance gate inside which a peak influences a vertex.
pub const DEFAULT_PEAK_INFLUENCE_SQ: f32 = 100_000.0;

fn check_length(length: usize) -> Result<(), ShapeError> {
    if length < 2 {
        return Err(ShapeError::GridTooSmall(length));
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), ShapeError> {
    if value < 0.0 {
        return Err(ShapeError::NegativeParameter { name, value });
    }
    Ok(())
}

/// Squared grid distance of sample `(i, j)` from the grid center.
///
/// The center uses integer division, matching the sample lattice.
fn center_distance_sq(i: usize, j: usize, length: usize) -> f32 {
    let c = (length / 2) as isize;
    let di = i as isize - c;
    let dj = j as isize - c;
    (di * di + dj * dj) as f32
}

/// Splits each interior grid quad into two triangles.
///
/// Vertices are laid out with `length` samples per row (flat index
/// `i * length + j`); cells in the last column are skipped so no triangle
/// wraps across rows. Emits `2 * (length - 1)^2` triangles. The default
/// winding faces up for the height-field layout; `reversed` flips it for
/// the ring layout, whose grid axes sweep the other way around.
fn triangulate_grid(length: usize, reversed: bool) -> Vec<u32> {
    let length = length as u32;
    let mut indices = Vec::with_capacity(6 * (length as usize - 1) * (length as usize - 1));
    for a in 0..length * (length - 1) {
        if a % length == length - 1 {
            continue;
        }
        if reversed {
            indices.extend_from_slice(&[a, a + length, a + 1]);
            indices.extend_from_slice(&[a + length, a + length + 1, a + 1]);
        } else {
            indices.extend_from_slice(&[a + 1, a + length, a]);
            indices.extend_from_slice(&[a + 1, a + length + 1, a + length]);
        }
    }
    indices
}

/// A single mountain with radial falloff from the grid center.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mountain {
    /// Samples per grid side.
    pub length: usize,
    /// Peak height before noise.
    pub base_height: f32,
    /// Radial falloff rate; smaller is wider.
    pub slope: f32,
    /// World-space x/z of the grid corner.
    pub origin: Vec2,
    /// Refinement attempts after triangulation.
    pub divisions: usize,
    /// Spike magnitude for the refinement pass.
    pub spike: f32,
}

impl Default for Mountain {
    fn default() -> Self {
        Self {
            length: 40,
            base_height: 20.0,
            slope: 0.009,
            origin: Vec2::ZERO,
            divisions: 1000,
            spike: 0.01,
        }
    }
}

impl Mountain {
    /// Synthesizes the mountain mesh.
    pub fn apply<R: Rng>(&self, rng: &mut R) -> Result<Mesh, ShapeError> {
        check_length(self.length)?;
        check_non_negative("slope", self.slope)?;

        let mut mesh = Mesh::with_capacity(
            self.length * self.length + self.divisions,
            2 * (self.length - 1) * (self.length - 1) + 2 * self.divisions,
        );
        for i in 0..self.length {
            for j in 0..self.length {
                let noise: f32 = rng.random_range(0.0..5.0);
                let r2 = center_distance_sq(i, j, self.length);
                let height = (self.base_height + noise) * (-self.slope * r2).exp();
                mesh.push_vertex(Vec3::new(
                    self.origin.x + i as f32,
                    height,
                    self.origin.y + j as f32,
                ));
            }
        }
        mesh.indices = triangulate_grid(self.length, false);

        run_schedule(
            rng,
            self.divisions,
            SpikeSchedule::Constant(self.spike),
            &mut mesh,
        );
        Ok(mesh)
    }
}

/// A volcano: a mountain flank with a depressed cauldron inside the crater.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Volcano {
    /// Samples per grid side.
    pub length: usize,
    /// Rim height before noise.
    pub base_height: f32,
    /// Outer flank falloff rate.
    pub slope: f32,
    /// Crater falloff rate toward the cauldron floor.
    pub interior_slope: f32,
    /// Squared-distance threshold separating cauldron from flank.
    pub crater_radius: f32,
    /// World-space x/z of the grid corner.
    pub origin: Vec2,
    /// Refinement attempts after triangulation.
    pub divisions: usize,
    /// Spike magnitude for the refinement pass.
    pub spike: f32,
}

impl Default for Volcano {
    fn default() -> Self {
        Self {
            length: 40,
            base_height: 20.0,
            slope: 0.008,
            interior_slope: 0.3,
            crater_radius: 100.0,
            origin: Vec2::ZERO,
            divisions: 1000,
            spike: 0.01,
        }
    }
}

/// Height of a volcano sample at squared center distance `r2`.
///
/// Both branches share the same `coeff` scaling derived from the combined
/// slopes, so the two meet continuously at the crater boundary. The
/// derivative jumps there; that artifact is accepted.
fn volcano_height(
    base_height: f32,
    slope: f32,
    interior_slope: f32,
    crater_radius: f32,
    noise: f32,
    r2: f32,
) -> f32 {
    if r2 < crater_radius {
        let coeff = (base_height + noise) * (-crater_radius * (slope + interior_slope)).exp();
        coeff * (interior_slope * r2).exp()
    } else {
        (base_height + noise) * (-slope * r2).exp()
    }
}

impl Volcano {
    /// Synthesizes the volcano mesh.
    pub fn apply<R: Rng>(&self, rng: &mut R) -> Result<Mesh, ShapeError> {
        check_length(self.length)?;
        check_non_negative("slope", self.slope)?;
        check_non_negative("interior_slope", self.interior_slope)?;
        check_non_negative("crater_radius", self.crater_radius)?;

        let mut mesh = Mesh::with_capacity(
            self.length * self.length + self.divisions,
            2 * (self.length - 1) * (self.length - 1) + 2 * self.divisions,
        );
        for i in 0..self.length {
            for j in 0..self.length {
                let noise: f32 = rng.random_range(0.0..5.0);
                let r2 = center_distance_sq(i, j, self.length);
                let height = volcano_height(
                    self.base_height,
                    self.slope,
                    self.interior_slope,
                    self.crater_radius,
                    noise,
                    r2,
                );
                mesh.push_vertex(Vec3::new(
                    self.origin.x + i as f32,
                    height,
                    self.origin.y + j as f32,
                ));
            }
        }
        mesh.indices = triangulate_grid(self.length, false);

        run_schedule(
            rng,
            self.divisions,
            SpikeSchedule::Constant(self.spike),
            &mut mesh,
        );
        Ok(mesh)
    }
}

/// A single peak of a mountain range.
///
/// Ephemeral: generated fresh per build, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakPoint {
    /// Grid x coordinate.
    pub x: f32,
    /// Grid y coordinate.
    pub y: f32,
    /// Squared grid distance inside which the peak contributes.
    pub influence_sq: f32,
    /// Target height at the peak.
    pub height: f32,
}

/// Multiple peaks blended into one rolling range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MountainRange {
    /// Samples per grid side.
    pub length: usize,
    /// Number of peaks to scatter.
    pub peak_count: usize,
    /// Peak target heights draw uniformly from `0..max_peak_height`.
    pub max_peak_height: f32,
    /// World-space x/z of the grid corner.
    pub origin: Vec2,
}

impl Default for MountainRange {
    fn default() -> Self {
        Self {
            length: 40,
            peak_count: 100,
            max_peak_height: 100.0,
            origin: Vec2::ZERO,
        }
    }
}

impl MountainRange {
    /// Synthesizes the range with freshly scattered random peaks.
    pub fn apply<R: Rng>(&self, rng: &mut R) -> Result<Mesh, ShapeError> {
        check_length(self.length)?;
        check_non_negative("max_peak_height", self.max_peak_height)?;

        let peaks: Vec<PeakPoint> = (0..self.peak_count)
            .map(|_| PeakPoint {
                x: rng.random_range(0..self.length) as f32,
                y: rng.random_range(0..self.length) as f32,
                influence_sq: DEFAULT_PEAK_INFLUENCE_SQ,
                height: rng.random_range(0.0..self.max_peak_height.max(f32::EPSILON)),
            })
            .collect();
        self.apply_with_peaks(rng, &peaks)
    }

    /// Synthesizes the range from explicit peaks.
    ///
    /// Every peak within its influence distance of a vertex contributes
    /// `(height + noise) * exp(-0.01 * radsq)` once, plus once more per
    /// satisfied nested distance band, and the vertex height is the average
    /// of all contributions. The extra band contributions weight close
    /// peaks more heavily, smoothing the field directly under peak
    /// clusters. Vertices no peak reaches fall back to bare jitter.
    pub fn apply_with_peaks<R: Rng>(
        &self,
        rng: &mut R,
        peaks: &[PeakPoint],
    ) -> Result<Mesh, ShapeError> {
        check_length(self.length)?;

        let bands = [
            self.length as f32 * 0.05,
            self.length as f32 * 0.1,
            self.length as f32 * 0.2,
        ];
        let mut mesh = Mesh::with_capacity(
            self.length * self.length,
            2 * (self.length - 1) * (self.length - 1),
        );
        for i in 0..self.length {
            for j in 0..self.length {
                let noise: f32 = rng.random_range(0.0..0.02);
                let mut sum = 0.0;
                let mut contributions = 0u32;
                for peak in peaks {
                    let di = i as f32 - peak.x;
                    let dj = j as f32 - peak.y;
                    let radsq = di * di + dj * dj;
                    if radsq >= peak.influence_sq {
                        continue;
                    }
                    let contribution = (peak.height + noise) * (-0.01 * radsq).exp();
                    sum += contribution;
                    contributions += 1;
                    for &band in &bands {
                        if radsq < band {
                            sum += contribution;
                            contributions += 1;
                        }
                    }
                }
                let height = if contributions == 0 {
                    noise
                } else {
                    sum / contributions as f32
                };
                mesh.push_vertex(Vec3::new(
                    self.origin.x + i as f32,
                    height,
                    self.origin.y + j as f32,
                ));
            }
        }
        mesh.indices = triangulate_grid(self.length, false);
        Ok(mesh)
    }
}

/// A flat ring of concentric vertex circles, suitable as a race track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvedTrack {
    /// Samples per grid side: rings, and points per ring.
    pub length: usize,
    /// World-space center of the ring.
    pub center: Vec3,
    /// Radius of the innermost ring.
    pub inner_radius: f32,
    /// Radial distance between consecutive rings.
    pub ring_spacing: f32,
}

impl Default for CurvedTrack {
    fn default() -> Self {
        Self {
            length: 40,
            center: Vec3::ZERO,
            inner_radius: 30.0,
            ring_spacing: 10.0,
        }
    }
}

impl CurvedTrack {
    /// Synthesizes the track mesh. Deterministic; no randomness involved.
    pub fn apply(&self) -> Result<Mesh, ShapeError> {
        check_length(self.length)?;
        check_non_negative("inner_radius", self.inner_radius)?;
        check_non_negative("ring_spacing", self.ring_spacing)?;

        // The angle step closes the sweep: i = length - 1 lands back on the
        // start angle, so the seam is a pair of coincident vertex columns.
        let theta = TAU / (self.length - 1) as f32;
        let mut mesh = Mesh::with_capacity(
            self.length * self.length,
            2 * (self.length - 1) * (self.length - 1),
        );
        for i in 0..self.length {
            for j in 0..self.length {
                let radius = self.inner_radius + self.ring_spacing * j as f32;
                let angle = theta * i as f32;
                mesh.push_vertex(Vec3::new(
                    self.center.x + radius * angle.cos(),
                    self.center.y,
                    self.center.z + radius * angle.sin(),
                ));
            }
        }
        mesh.indices = triangulate_grid(self.length, true);
        Ok(mesh)
    }
}

/// Tagged selection over the built-in landscape shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Landform {
    /// Single radial-falloff mountain.
    Mountain(Mountain),
    /// Crater-and-flank volcano.
    Volcano(Volcano),
    /// Multi-peak blended range.
    MountainRange(MountainRange),
    /// Flat parametric ring track.
    CurvedTrack(CurvedTrack),
}

impl Landform {
    /// Synthesizes the selected shape into a fresh mesh.
    pub fn apply<R: Rng>(&self, rng: &mut R) -> Result<Mesh, ShapeError> {
        match self {
            Landform::Mountain(shape) => shape.apply(rng),
            Landform::Volcano(shape) => shape.apply(rng),
            Landform::MountainRange(shape) => shape.apply(rng),
            Landform::CurvedTrack(shape) => shape.apply(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::triangle_normal;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn average_normal_y(mesh: &Mesh) -> f32 {
        let count = mesh.triangle_count();
        let sum: f32 = (0..count)
            .map(|slot| {
                let [a, b, c] = mesh.triangle_positions(slot);
                triangle_normal(a, b, c).y
            })
            .sum();
        sum / count as f32
    }

    #[test]
    fn test_grid_triangulation_count() {
        for length in [2, 5, 10, 40] {
            let indices = triangulate_grid(length, false);
            assert_eq!(indices.len(), 3 * 2 * (length - 1) * (length - 1));
        }
    }

    #[test]
    fn test_grid_triangulation_no_wraparound() {
        let length = 6u32;
        let indices = triangulate_grid(length as usize, false);
        for tri in indices.chunks(3) {
            // Triangles span exactly two adjacent rows.
            let rows: Vec<u32> = tri.iter().map(|&v| v / length).collect();
            let min = *rows.iter().min().unwrap();
            assert!(rows.iter().all(|&r| r == min || r == min + 1));
            // And two adjacent columns.
            let cols: Vec<u32> = tri.iter().map(|&v| v % length).collect();
            let min = *cols.iter().min().unwrap();
            assert!(cols.iter().all(|&c| c == min || c == min + 1));
        }
    }

    #[test]
    fn test_mountain_counts_before_refinement() {
        let mut rng = StdRng::seed_from_u64(10);
        let mesh = Mountain {
            length: 10,
            divisions: 0,
            ..Default::default()
        }
        .apply(&mut rng)
        .unwrap();
        assert_eq!(mesh.vertex_count(), 100);
        assert_eq!(mesh.triangle_count(), 2 * 9 * 9);
        assert!(mesh.indices_valid());
    }

    #[test]
    fn test_mountain_tallest_at_center() {
        let mut rng = StdRng::seed_from_u64(11);
        let shape = Mountain {
            length: 21,
            divisions: 0,
            ..Default::default()
        };
        let mesh = shape.apply(&mut rng).unwrap();
        let center = mesh.positions[10 * 21 + 10].y;
        let corner = mesh.positions[0].y;
        assert!(center >= shape.base_height);
        assert!(corner < center / 2.0);
    }

    #[test]
    fn test_rejects_short_grid() {
        let mut rng = StdRng::seed_from_u64(12);
        let err = Mountain {
            length: 1,
            ..Default::default()
        }
        .apply(&mut rng)
        .unwrap_err();
        assert_eq!(err, ShapeError::GridTooSmall(1));
    }

    #[test]
    fn test_rejects_negative_slope() {
        let mut rng = StdRng::seed_from_u64(13);
        let err = Volcano {
            slope: -0.5,
            ..Default::default()
        }
        .apply(&mut rng)
        .unwrap_err();
        assert_eq!(
            err,
            ShapeError::NegativeParameter {
                name: "slope",
                value: -0.5
            }
        );
    }

    #[test]
    fn test_all_synthesizers_face_up() {
        let mut rng = StdRng::seed_from_u64(14);
        let shapes = [
            Landform::Mountain(Mountain {
                divisions: 0,
                ..Default::default()
            }),
            Landform::Volcano(Volcano {
                divisions: 0,
                ..Default::default()
            }),
            Landform::MountainRange(MountainRange::default()),
            Landform::CurvedTrack(CurvedTrack::default()),
        ];
        for shape in shapes {
            let mesh = shape.apply(&mut rng).unwrap();
            assert!(
                average_normal_y(&mesh) > 0.0,
                "downward-facing surface from {shape:?}"
            );
        }
    }

    #[test]
    fn test_volcano_boundary_continuous() {
        let shape = Volcano::default();
        let noise = 2.5;
        let mut eps = 1.0f32;
        for _ in 0..6 {
            let inside = volcano_height(
                shape.base_height,
                shape.slope,
                shape.interior_slope,
                shape.crater_radius,
                noise,
                shape.crater_radius - eps,
            );
            let outside = volcano_height(
                shape.base_height,
                shape.slope,
                shape.interior_slope,
                shape.crater_radius,
                noise,
                shape.crater_radius + eps,
            );
            // Gap shrinks with epsilon; at 1e-3 the two branches agree closely.
            assert!(
                (inside - outside).abs() <= (shape.base_height + noise) * eps,
                "discontinuity at eps {eps}"
            );
            eps *= 0.1;
        }
    }

    #[test]
    fn test_volcano_cauldron_below_rim() {
        let shape = Volcano::default();
        let noise = 0.0;
        let floor = volcano_height(
            shape.base_height,
            shape.slope,
            shape.interior_slope,
            shape.crater_radius,
            noise,
            0.0,
        );
        let rim = volcano_height(
            shape.base_height,
            shape.slope,
            shape.interior_slope,
            shape.crater_radius,
            noise,
            shape.crater_radius,
        );
        assert!(floor < rim);
    }

    #[test]
    fn test_range_single_peak_bump() {
        let mut rng = StdRng::seed_from_u64(15);
        let shape = MountainRange {
            length: 11,
            peak_count: 0,
            ..Default::default()
        };
        let peak = PeakPoint {
            x: 5.0,
            y: 5.0,
            influence_sq: 9.0,
            height: 100.0,
        };
        let mesh = shape.apply_with_peaks(&mut rng, &[peak]).unwrap();

        // Bump at the peak, near-zero out of its influence.
        let at_peak = mesh.positions[5 * 11 + 5].y;
        assert!(at_peak > 50.0);
        let corner = mesh.positions[0].y;
        assert!(corner < 0.1);
        // Heights fall off monotonically-ish along a row toward the peak.
        let next_to_peak = mesh.positions[5 * 11 + 6].y;
        assert!(next_to_peak > corner && next_to_peak < at_peak * 1.1);
    }

    #[test]
    fn test_range_no_peaks_is_flat_jitter() {
        let mut rng = StdRng::seed_from_u64(16);
        let mesh = MountainRange {
            length: 8,
            peak_count: 0,
            ..Default::default()
        }
        .apply(&mut rng)
        .unwrap();
        for p in &mesh.positions {
            assert!(p.y >= 0.0 && p.y < 0.02);
        }
    }

    #[test]
    fn test_track_is_flat_and_ring_shaped() {
        let shape = CurvedTrack::default();
        let mesh = shape.apply().unwrap();
        assert_eq!(mesh.vertex_count(), 40 * 40);
        assert_eq!(mesh.triangle_count(), 2 * 39 * 39);
        for p in &mesh.positions {
            assert_eq!(p.y, 0.0);
            let radius = Vec2::new(p.x, p.z).length();
            assert!(radius >= shape.inner_radius - 1e-3);
            assert!(radius <= shape.inner_radius + shape.ring_spacing * 39.0 + 1e-2);
        }
    }

    #[test]
    fn test_track_seam_closes() {
        let length = 12;
        let mesh = CurvedTrack {
            length,
            ..Default::default()
        }
        .apply()
        .unwrap();
        // First and last vertex columns coincide: the sweep covers a full turn.
        for j in 0..length {
            let first = mesh.positions[j];
            let last = mesh.positions[(length - 1) * length + j];
            assert!((first - last).length() < 1e-3);
        }
    }

    #[test]
    fn test_landform_deterministic_under_seed() {
        let shape = Landform::Volcano(Volcano {
            divisions: 100,
            ..Default::default()
        });
        let a = shape.apply(&mut StdRng::seed_from_u64(17)).unwrap();
        let b = shape.apply(&mut StdRng::seed_from_u64(17)).unwrap();
        assert_eq!(a, b);
    }
}
