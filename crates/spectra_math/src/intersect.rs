//! Analytic ray/primitive intersection kernels.
//!
//! Every kernel is a pure function returning an optional ray parameter;
//! nothing here allocates or touches shared state, so the kernels are safe
//! to call from any number of threads.

use crate::{Aabb, Ray, Sphere, Triangle};

/// Ray/box slab test. Returns the entry parameter `t_min` on a hit.
///
/// Divisions by zero direction components produce infinities that flow
/// through the interval arithmetic; they are deliberately not special-cased.
pub fn ray_aabb(r: &Ray, b: &Aabb) -> Option<f32> {
    let mut t_min = f32::MIN;
    let mut t_max = f32::MAX;

    for axis in 0..3 {
        let inv = 1.0 / r.direction[axis];
        let mut t0 = (b.min[axis] - r.origin[axis]) * inv;
        let mut t1 = (b.max[axis] - r.origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_min {
            t_min = t0;
        }
        if t1 < t_max {
            t_max = t1;
        }

        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Ray/triangle test, Möller-Trumbore style.
///
/// Rejects near-parallel configurations where the determinant magnitude
/// falls below machine epsilon, barycentric coordinates outside [0, 1],
/// and hits behind the ray origin.
pub fn ray_triangle(r: &Ray, tri: &Triangle) -> Option<f32> {
    let e1 = tri.p1 - tri.p0;
    let e2 = tri.p2 - tri.p0;

    let p = r.direction.cross(e2);
    let det = e1.dot(p);

    if det.abs() < f32::EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = r.origin - tri.p0;
    let u = p.dot(s) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = r.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    if t < 0.0 {
        return None;
    }

    Some(t)
}

/// Ray/sphere test via the quadratic formula (half-b form).
///
/// Returns the smaller non-negative root, falling back to the far root when
/// the origin is inside the sphere.
pub fn ray_sphere(r: &Ray, s: &Sphere) -> Option<f32> {
    let oc = s.center - r.origin;
    let a = r.direction.dot(r.direction);
    let h = r.direction.dot(oc);
    let c = oc.dot(oc) - s.radius * s.radius;
    let d = h * h - a * c;
    if d < 0.0 {
        return None;
    }

    let sqrt_d = d.sqrt();
    let t = (h - sqrt_d) / a;
    if t >= 0.0 {
        return Some(t);
    }
    let t = (h + sqrt_d) / a;
    if t >= 0.0 {
        return Some(t);
    }

    None
}

/// Brute-force per-axis interval intersection, used as a reference for the
/// slab test in property checks.
#[doc(hidden)]
pub fn ray_aabb_reference(r: &Ray, b: &Aabb) -> Option<f32> {
    let mut lo = f32::MIN;
    let mut hi = f32::MAX;

    for axis in 0..3 {
        let o = r.origin[axis];
        let d = r.direction[axis];
        let (mut a0, mut a1) = ((b.min[axis] - o) / d, (b.max[axis] - o) / d);
        if a0 > a1 {
            std::mem::swap(&mut a0, &mut a1);
        }
        lo = lo.max(a0);
        hi = hi.min(a1);
    }

    if lo <= hi {
        Some(lo)
    } else {
        None
    }
}
