//! Scene: a triangle mesh plus per-group material assignments.

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::{Material, TriangleMesh};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene has no faces")]
    Empty,

    #[error("face {face} references vertex index {index} out of range")]
    DanglingVertex { face: u32, index: u32 },

    #[error("face {face} references texcoord index {index} out of range")]
    DanglingTexcoord { face: u32, index: u32 },

    #[error("face {face} references normal index {index} out of range")]
    DanglingNormal { face: u32, index: u32 },
}

/// A renderable scene.
///
/// Owns the mesh and one material slot per face group. The renderer core
/// borrows the geometry arrays for BVH build and traversal and performs
/// per-face material lookups through [`Scene::material`].
pub struct Scene {
    pub mesh: TriangleMesh,
    /// One material per entry of `mesh.groups`, default-initialized
    materials: Vec<Material>,
    /// Exclusive face-index end of each group range, ascending; computed
    /// once from `mesh.groups`, which must not change afterwards
    group_ends: Vec<u32>,
    fallback: Material,
}

impl Scene {
    pub fn new(mesh: TriangleMesh) -> Self {
        let materials = vec![Material::default(); mesh.groups.len()];
        let mut group_ends = Vec::with_capacity(mesh.groups.len());
        let mut end = 0u32;
        for (_, count) in &mesh.groups {
            end += count;
            group_ends.push(end);
        }
        Self {
            mesh,
            materials,
            group_ends,
            fallback: Material::default(),
        }
    }

    /// Assign a material to a named group. Returns false when no group with
    /// that name exists.
    pub fn set_material(&mut self, group: &str, material: Material) -> bool {
        let mut found = false;
        for (i, (name, _)) in self.mesh.groups.iter().enumerate() {
            if name == group {
                self.materials[i] = material.clone();
                found = true;
            }
        }
        if !found {
            log::warn!("set_material: no group named {group:?}");
        }
        found
    }

    /// Material of the group containing `face`; faces outside every group
    /// get the default material.
    ///
    /// Binary search over the precomputed range ends, O(log groups) per hit.
    pub fn material(&self, face: u32) -> &Material {
        let i = self.group_ends.partition_point(|&end| end <= face);
        self.materials.get(i).unwrap_or(&self.fallback)
    }

    /// Shading normal at a surface point of a face.
    ///
    /// Interpolates vertex normals barycentrically when the face carries
    /// normal indices, otherwise falls back to the geometric normal.
    pub fn shading_normal(&self, p: Vec3, face: u32) -> Vec3 {
        let tri = self.mesh.triangle(face);
        match self.mesh.face_normals[face as usize] {
            Some(idx) => {
                let b = tri.barycentric(p);
                (b.x * self.mesh.normals[idx.x as usize]
                    + b.y * self.mesh.normals[idx.y as usize]
                    + b.z * self.mesh.normals[idx.z as usize])
                    .normalize()
            }
            None => tri.geometric_normal(),
        }
    }

    /// Interpolated texture coordinates at a surface point of a face.
    ///
    /// Faces without texcoord indices return the raw barycentric (v, w)
    /// pair, which is meaningless but stable.
    pub fn texcoord(&self, p: Vec3, face: u32) -> Vec2 {
        let tri = self.mesh.triangle(face);
        let b = tri.barycentric(p);
        match self.mesh.face_texcoords[face as usize] {
            Some(idx) => {
                b.x * self.mesh.texcoords[idx.x as usize]
                    + b.y * self.mesh.texcoords[idx.y as usize]
                    + b.z * self.mesh.texcoords[idx.z as usize]
            }
            None => Vec2::new(b.y, b.z),
        }
    }

    /// Boundary precondition check guarding the renderer core: the mesh is
    /// non-empty and every face index resolves.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.mesh.faces.is_empty() {
            return Err(SceneError::Empty);
        }

        for (face, idx) in self.mesh.faces.iter().enumerate() {
            let face = face as u32;
            for index in [idx.x, idx.y, idx.z] {
                if index as usize >= self.mesh.positions.len() {
                    return Err(SceneError::DanglingVertex { face, index });
                }
            }
        }
        for (face, idx) in self.mesh.face_texcoords.iter().enumerate() {
            let face = face as u32;
            if let Some(idx) = idx {
                for index in [idx.x, idx.y, idx.z] {
                    if index as usize >= self.mesh.texcoords.len() {
                        return Err(SceneError::DanglingTexcoord { face, index });
                    }
                }
            }
        }
        for (face, idx) in self.mesh.face_normals.iter().enumerate() {
            let face = face as u32;
            if let Some(idx) = idx {
                for index in [idx.x, idx.y, idx.z] {
                    if index as usize >= self.mesh.normals.len() {
                        return Err(SceneError::DanglingNormal { face, index });
                    }
                }
            }
        }

        Ok(())
    }
}
