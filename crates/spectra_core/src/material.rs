//! Per-group surface material.

use glam::Vec3;

/// Material record attached to a named group of faces.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse reflectance color (RGB, 0-1)
    pub albedo: Vec3,

    /// Radiant exitance (RGB, zero for non-emitters)
    pub emission: Vec3,

    /// Perceptual roughness; the microfacet alpha is roughness squared
    pub roughness: f32,

    /// Refractive index; 0.0 marks an opaque surface that never transmits
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::splat(0.8),
            emission: Vec3::ZERO,
            roughness: 1.0,
            ior: 0.0,
        }
    }
}

impl Material {
    pub fn new(albedo: Vec3, emission: Vec3, roughness: f32, ior: f32) -> Self {
        Self {
            albedo,
            emission,
            roughness,
            ior,
        }
    }

    /// True when the material contributes light of its own.
    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }

    /// True when the material can transmit light.
    #[inline]
    pub fn is_transmissive(&self) -> bool {
        self.ior > 0.0
    }
}

/// Refractive index constants for common media.
pub mod ior {
    pub const AIR: f32 = 1.000292;
    pub const ICE: f32 = 1.309;
    pub const WATER: f32 = 1.3334;
    pub const CROWN_GLASS: f32 = 1.52;
    pub const SAPPHIRE: f32 = 1.770;
    pub const DIAMOND: f32 = 2.417;
}
