//! Axis-aligned bounding box for spatial acceleration structures (BVH).

use glam::Vec3;

use crate::Triangle;

/// Axis-aligned bounding box stored as min/max corner points.
///
/// A box is valid iff `min <= max` componentwise. [`Aabb::INVALID`] is the
/// identity element of [`Aabb::merge`], so tight bounds over a primitive set
/// can be folded up starting from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The invalid (empty) box: merging anything into it yields that thing.
    pub const INVALID: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a box from explicit corners. No ordering is enforced;
    /// use [`Aabb::from_points`] for unordered input.
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create the smallest box containing two arbitrary points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Tight bounds of a triangle.
    pub fn from_triangle(t: &Triangle) -> Self {
        Self {
            min: t.p0.min(t.p1).min(t.p2),
            max: t.p0.max(t.p1).max(t.p2),
        }
    }

    /// True iff `min <= max` on every axis. A degenerate box with
    /// `min == max` counts as valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// The smallest box containing both inputs.
    ///
    /// Commutative, associative, and idempotent; [`Aabb::INVALID`] is the
    /// identity.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point of the box.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Surface area of the box.
    #[inline]
    pub fn area(&self) -> f32 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::INVALID
    }
}
