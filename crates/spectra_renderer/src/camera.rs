//! Pinhole camera for primary ray generation.

use glam::Vec3;
use rand::RngCore;
use spectra_math::Ray;

use crate::rng::gen_f32;

/// Maps discrete pixel coordinates to world-space primary rays.
///
/// The viewport is placed at the look-at distance; per-pixel deltas and the
/// center of pixel (0, 0) are precomputed at construction.
#[derive(Debug, Clone)]
pub struct Camera {
    pub from: Vec3,
    pub at: Vec3,
    pub up: Vec3,

    du: Vec3,
    dv: Vec3,
    first_pixel: Vec3,
}

impl Camera {
    /// Create a camera from eye position, look-at target, up vector,
    /// vertical field of view in degrees, and output resolution.
    pub fn new(from: Vec3, at: Vec3, up: Vec3, vfov: f32, width: u32, height: u32) -> Self {
        let focal_length = (from - at).length();
        let h = (vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focal_length;
        let viewport_width = viewport_height * (width as f32 / height as f32);

        let w = (from - at).normalize();
        let u = up.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = u * viewport_width;
        let viewport_v = -v * viewport_height;

        let du = viewport_u / width as f32;
        let dv = viewport_v / height as f32;

        let viewport_upper_left = from - w * focal_length - viewport_u / 2.0 - viewport_v / 2.0;
        let first_pixel = viewport_upper_left + 0.5 * (du + dv);

        Self {
            from,
            at,
            up,
            du,
            dv,
            first_pixel,
        }
    }

    /// Deterministic ray through the center of pixel (i, j).
    pub fn ray(&self, i: u32, j: u32) -> Ray {
        let pixel = self.first_pixel + i as f32 * self.du + j as f32 * self.dv;
        Ray::new(self.from, (pixel - self.from).normalize())
    }

    /// Ray through pixel (i, j) jittered within the pixel footprint.
    ///
    /// Consumes two draws: independent uniform offsets in [-0.5, 0.5) along
    /// each viewport axis.
    pub fn ray_jittered(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_x = gen_f32(rng) - 0.5;
        let offset_y = gen_f32(rng) - 0.5;

        let pixel = self.first_pixel
            + (i as f32 + offset_x) * self.du
            + (j as f32 + offset_y) * self.dv;
        Ray::new(self.from, (pixel - self.from).normalize())
    }
}
