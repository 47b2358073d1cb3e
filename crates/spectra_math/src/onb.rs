//! Orthonormal basis construction around a normal.

use glam::Vec3;

/// Map a local-frame vector `v` (with z along the normal) into world space.
///
/// Builds a tangent frame around the unit normal `n` by crossing against a
/// fixed world axis chosen to avoid near-parallel degeneracy, then combines
/// the local components. The result is normalized.
pub fn onb(n: Vec3, v: Vec3) -> Vec3 {
    let axis = if n.x.abs() > 0.001 { Vec3::Y } else { Vec3::X };
    let t = axis.cross(n).normalize();
    let s = n.cross(t);

    (s * v.x + t * v.y + n * v.z).normalize()
}
