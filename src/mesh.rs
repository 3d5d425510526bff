//! Core mesh types.

use glam::Vec3;

/// A 3D mesh with indexed triangle topology.
///
/// The vertex list is append-only during a build: subdivision never moves
/// existing vertices, it only adds new ones. Triangles are triples of
/// indices into the vertex list, wound clockwise as seen from the outward
/// side. Invariants held at all times: every index is `< vertex_count()`
/// and `indices.len()` is a multiple of 3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, filled in by [`Mesh::finalize`].
    pub normals: Vec<Vec3>,
    /// Triangle indices (every 3 indices form a triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::new(),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of complete triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.len() == self.positions.len()
    }

    /// Returns the index triple of the triangle at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= triangle_count()`.
    pub fn triangle(&self, slot: usize) -> [u32; 3] {
        let base = slot * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// Returns the vertex positions of the triangle at `slot`.
    pub fn triangle_positions(&self, slot: usize) -> [Vec3; 3] {
        let [i0, i1, i2] = self.triangle(slot);
        [
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
        ]
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        index
    }

    /// Appends a triangle from three vertex indices.
    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Removes the triangle at `slot` by swapping it with the last triangle.
    ///
    /// Only the removed slot and the last slot change position; no other
    /// triangle shifts, so slots held across the call stay valid except for
    /// the last one.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= triangle_count()`.
    pub fn swap_remove_triangle(&mut self, slot: usize) {
        let last = self.triangle_count() - 1;
        let base = slot * 3;
        let last_base = last * 3;
        for k in 0..3 {
            self.indices.swap(base + k, last_base + k);
        }
        self.indices.truncate(last_base);
    }

    /// Returns true if every triangle index refers to an existing vertex
    /// and the index list holds only complete triangles.
    pub fn indices_valid(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.positions.len())
    }

    /// Computes smooth normals by averaging adjacent face normals.
    pub fn compute_smooth_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        // Accumulate face normals at each vertex
        for tri in self.indices.chunks(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let v0 = self.positions[i0];
            let v1 = self.positions[i1];
            let v2 = self.positions[i2];

            let normal = (v1 - v0).cross(v2 - v1); // unnormalized = area-weighted

            self.normals[i0] += normal;
            self.normals[i1] += normal;
            self.normals[i2] += normal;
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    /// Finishes a build: recomputes smooth normals so the buffer is ready
    /// to hand off to a renderer.
    ///
    /// Idempotent on an unmutated mesh; normals are a pure function of the
    /// positions and indices.
    pub fn finalize(&mut self) {
        self.compute_smooth_normals();
    }
}

/// Builder for constructing meshes vertex by vertex.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    /// Creates a new mesh builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex, returning its index.
    pub fn vertex(&mut self, position: Vec3) -> u32 {
        self.mesh.push_vertex(position)
    }

    /// Adds a triangle from three vertex indices.
    pub fn triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.mesh.push_triangle(i0, i1, i2);
    }

    /// Builds the final mesh.
    pub fn build(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> Mesh {
        let mut builder = MeshBuilder::new();
        let v0 = builder.vertex(Vec3::new(0.0, 0.0, 0.0));
        let v1 = builder.vertex(Vec3::new(1.0, 0.0, 0.0));
        let v2 = builder.vertex(Vec3::new(0.0, 0.0, 1.0));
        let v3 = builder.vertex(Vec3::new(1.0, 0.0, 1.0));
        builder.triangle(v2, v1, v0);
        builder.triangle(v2, v3, v1);
        builder.build()
    }

    #[test]
    fn test_mesh_builder() {
        let mesh = two_triangles();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices_valid());
    }

    #[test]
    fn test_triangle_accessors() {
        let mesh = two_triangles();
        assert_eq!(mesh.triangle(1), [2, 3, 1]);
        let [a, b, c] = mesh.triangle_positions(0);
        assert_eq!(a, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(b, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(c, Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_swap_remove_keeps_other_triangles() {
        let mut mesh = two_triangles();
        let second = mesh.triangle(1);
        mesh.swap_remove_triangle(0);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0), second);
        assert!(mesh.indices_valid());
    }

    #[test]
    fn test_swap_remove_last_slot() {
        let mut mesh = two_triangles();
        let first = mesh.triangle(0);
        mesh.swap_remove_triangle(1);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0), first);
    }

    #[test]
    fn test_smooth_normals_flat_quad_point_up() {
        let mut mesh = two_triangles();
        mesh.compute_smooth_normals();
        assert!(mesh.has_normals());
        for n in &mesh.normals {
            assert!(n.y > 0.99);
        }
    }

    #[test]
    fn test_finalize_idempotent() {
        let mut mesh = two_triangles();
        mesh.finalize();
        let once = mesh.clone();
        mesh.finalize();
        assert_eq!(mesh, once);
    }
}
