//! Spectra CPU path tracing core.
//!
//! Monte Carlo path tracing over a static triangle scene:
//! - flat, index-addressed bounding volume hierarchy (build + traversal)
//! - splittable-seed xoshiro/xoroshiro pseudo-random generators
//! - pinhole camera with optional per-pixel jitter
//! - Walter-style GGX microfacet BSDF with importance sampling
//! - Russian-roulette path integrator
//! - fixed worker pool pulling pixel rows from a shared queue

mod bvh;
mod camera;
mod integrator;
mod microfacet;
mod render;
mod rng;
mod sampling;

pub use bvh::{Bvh, BvhNode};
pub use camera::Camera;
pub use integrator::{Background, PathTracer, Termination};
pub use microfacet::{
    brdf, btdf, f0, fresnel_schlick, ndf_ggx, pdf_brdf, pdf_btdf, reflect, refract, sample_bsdf,
    sample_ggx, smith_g, BsdfSample,
};
pub use render::{render, RenderSettings};
pub use rng::{gen_f32, SplitMix64, Xoroshiro128pp, Xoshiro256p, Xoshiro256pp};
pub use sampling::{
    sample_cosine_hemisphere, sample_cosine_hemisphere_pdf, sample_uniform_hemisphere,
    sample_uniform_hemisphere_pdf, sample_uniform_sphere, sample_uniform_sphere_pdf,
};

/// Re-export the math types the renderer API surfaces.
pub use spectra_math::{Aabb, Ray, Sphere, Triangle, Vec3};
