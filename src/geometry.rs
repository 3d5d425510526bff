//! Triangle geometry primitives.

use glam::Vec3;

/// Unit normal of the plane through `a`, `b`, `c`.
///
/// Computed as the normalized cross product of `(b - a)` and `(c - b)`, so
/// the normal points toward the side from which the winding appears
/// clockwise. Returns the zero vector when the points are collinear;
/// callers are expected to skip displacement in that case.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - b).normalize_or_zero()
}

/// Area of the triangle `a`, `b`, `c`.
///
/// Half the magnitude of the cross product; zero for degenerate triangles.
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    0.5 * (b - a).cross(c - b).length()
}
