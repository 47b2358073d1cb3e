//! Indexed triangle mesh with optional per-face shading attributes.

use glam::{UVec3, Vec2, Vec3};
use spectra_math::Triangle;

/// An indexed triangle mesh.
///
/// Vertex positions are mandatory; texcoords and normals are optional per
/// face. A face either references a full index triple for an attribute or
/// carries `None` — raw sentinel indices are never used.
///
/// Faces are grouped into contiguous ranges by `groups`, in file order.
#[derive(Debug, Default)]
pub struct TriangleMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Texture coordinates referenced by `face_texcoords`
    pub texcoords: Vec<Vec2>,
    /// Shading normals referenced by `face_normals`
    pub normals: Vec<Vec3>,

    /// Per-face vertex index triples
    pub faces: Vec<UVec3>,
    /// Per-face texcoord index triples, when the face has them
    pub face_texcoords: Vec<Option<UVec3>>,
    /// Per-face normal index triples, when the face has them
    pub face_normals: Vec<Option<UVec3>>,

    /// Ordered (group name, face count) ranges covering `faces`
    pub groups: Vec<(String, u32)>,
}

impl TriangleMesh {
    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The three corner positions of a face.
    #[inline]
    pub fn triangle(&self, face: u32) -> Triangle {
        let idx = self.faces[face as usize];
        Triangle::new(
            self.positions[idx.x as usize],
            self.positions[idx.y as usize],
            self.positions[idx.z as usize],
        )
    }

    /// Name of the group containing `face`, if any group covers it.
    pub fn group_of(&self, face: u32) -> Option<&str> {
        let mut rest = face;
        for (name, count) in &self.groups {
            if rest < *count {
                return Some(name);
            }
            rest -= count;
        }
        None
    }

    /// Log mesh statistics the way the loader reports them.
    pub fn log_statistics(&self) {
        log::info!(
            "mesh: {} vertices, {} texcoords, {} normals, {} faces",
            self.positions.len(),
            self.texcoords.len(),
            self.normals.len(),
            self.faces.len()
        );
        for (name, count) in &self.groups {
            log::info!("group {name:?}: {count} faces");
        }
    }
}
