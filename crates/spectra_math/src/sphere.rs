//! Sphere primitive.

use glam::Vec3;

use crate::Ray;

/// A sphere given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Unit outward normal at a surface point.
    #[inline]
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize()
    }

    /// Outward normal flipped to face the incoming ray.
    pub fn normal_toward(&self, ray: &Ray, t: f32) -> Vec3 {
        let n = self.normal_at(ray.at(t));
        if ray.direction.dot(n) > 0.0 {
            -n
        } else {
            n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_normal_at() {
        let s = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let n = s.normal_at(Vec3::new(0.0, 0.0, -0.5));
        assert!((n - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_normal_toward_flips_inside() {
        let s = Sphere::new(Vec3::ZERO, 1.0);
        // Ray starting at the center hits the inside surface
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let n = s.normal_toward(&ray, 1.0);
        assert!((n + Vec3::X).length() < 1e-6);
    }
}
