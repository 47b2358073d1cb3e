// Re-export glam for convenience
pub use glam::*;

// Spectra math types
mod aabb;
mod onb;
mod ray;
mod sphere;
mod triangle;

pub mod intersect;

pub use aabb::Aabb;
pub use onb::onb;
pub use ray::Ray;
pub use sphere::Sphere;
pub use triangle::Triangle;
