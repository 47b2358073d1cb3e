//! Triangle primitive.

use glam::Vec3;

use crate::Ray;

/// A triangle given by three ordered points.
///
/// The front face is the side from which the winding p0 -> p1 -> p2 appears
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl Triangle {
    #[inline]
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self { p0, p1, p2 }
    }

    /// Average of the three vertices.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.p0 + self.p1 + self.p2) / 3.0
    }

    /// Surface area, half the parallelogram spanned by the edges.
    #[inline]
    pub fn area(&self) -> f32 {
        (self.p1 - self.p0).cross(self.p2 - self.p0).length() * 0.5
    }

    /// Unit geometric normal of the front face.
    #[inline]
    pub fn geometric_normal(&self) -> Vec3 {
        (self.p1 - self.p0).cross(self.p2 - self.p0).normalize()
    }

    /// Geometric normal flipped to face the incoming ray.
    pub fn normal_toward(&self, ray: &Ray) -> Vec3 {
        let n = self.geometric_normal();
        if ray.direction.dot(n) > 0.0 {
            -n
        } else {
            n
        }
    }

    /// Barycentric coordinates (u, v, w) of a point assumed to lie in the
    /// triangle's plane, with u weighting p0.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        let v0 = self.p1 - self.p0;
        let v1 = self.p2 - self.p0;
        let v2 = p - self.p0;
        let d00 = v0.dot(v0);
        let d01 = v0.dot(v1);
        let d11 = v1.dot(v1);
        let d20 = v2.dot(v0);
        let d21 = v2.dot(v1);

        let denominator = d00 * d11 - d01 * d01;

        let v = (d11 * d20 - d01 * d21) / denominator;
        let w = (d00 * d21 - d01 * d20) / denominator;
        let u = 1.0 - v - w;

        Vec3::new(u, v, w)
    }
}
