//! Scene representation for the Spectra path tracer.
//!
//! Owns everything the renderer core treats as input collaborators: the
//! triangle mesh with its optional per-face attributes, the per-group
//! material table, the OBJ loader that produces them, and the PPM raster
//! writer that consumes the finished pixel buffer.

mod material;
mod mesh;
mod obj;
mod ppm;
mod scene;

pub use material::{ior, Material};
pub use mesh::TriangleMesh;
pub use obj::{load_obj, ObjError};
pub use ppm::write_ppm;
pub use scene::{Scene, SceneError};
