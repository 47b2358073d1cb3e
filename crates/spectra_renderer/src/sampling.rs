//! Basic direction sampling routines.
//!
//! Uniform sphere/hemisphere and cosine-weighted hemisphere draws with
//! their matching solid-angle densities. Each sampler consumes exactly two
//! uniform draws.

use glam::Vec3;
use rand::RngCore;
use spectra_math::onb;

use crate::rng::gen_f32;

use std::f32::consts::PI;

/// Uniform direction on the unit sphere.
pub fn sample_uniform_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let cos_theta = 1.0 - 2.0 * r1;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * r2;

    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Density of [`sample_uniform_sphere`].
#[inline]
pub fn sample_uniform_sphere_pdf() -> f32 {
    1.0 / (4.0 * PI)
}

/// Uniform direction on the hemisphere around `n`.
pub fn sample_uniform_hemisphere(n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let d = sample_uniform_sphere(rng);
    if d.dot(n) < 0.0 {
        -d
    } else {
        d
    }
}

/// Density of [`sample_uniform_hemisphere`].
#[inline]
pub fn sample_uniform_hemisphere_pdf() -> f32 {
    1.0 / (2.0 * PI)
}

/// Cosine-weighted direction on the hemisphere around `n`.
pub fn sample_cosine_hemisphere(n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let sin_theta = r1.sqrt();
    let cos_theta = (1.0 - r1).max(0.0).sqrt();
    let phi = 2.0 * PI * r2;

    let local = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
    onb(n, local)
}

/// Density of [`sample_cosine_hemisphere`] for `direction` around `n`.
#[inline]
pub fn sample_cosine_hemisphere_pdf(n: Vec3, direction: Vec3) -> f32 {
    n.dot(direction).max(0.0) / PI
}
