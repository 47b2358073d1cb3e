//! Bounding volume hierarchy over an indexed triangle set.
//!
//! A static binary tree built once by recursive median splitting and stored
//! as a flat, index-addressed node array. The hierarchy owns only its node
//! list; the vertex/index arrays it was built over are borrowed again for
//! every build and trace call and must not be reordered in between.

use std::collections::VecDeque;

use glam::{UVec3, Vec3};
use spectra_math::{intersect, Aabb, Ray, Triangle};

/// One node of the hierarchy.
///
/// Child references are signed: a value > 0 is the index of an internal
/// node, a value <= 0 is a leaf whose primitive index is the negation.
/// Primitive 0 encodes as 0, so the internal-node test is strictly `> 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BvhNode {
    pub left_box: Aabb,
    pub right_box: Aabb,
    pub left: i32,
    pub right: i32,
}

/// Flat bounding volume hierarchy.
pub struct Bvh {
    nodes: Vec<BvhNode>,
}

fn triangle_of(positions: &[Vec3], faces: &[UVec3], face: u32) -> Triangle {
    let idx = faces[face as usize];
    Triangle::new(
        positions[idx.x as usize],
        positions[idx.y as usize],
        positions[idx.z as usize],
    )
}

impl Bvh {
    /// Build the hierarchy over every face of the mesh.
    ///
    /// Breadth-first: an explicit queue of (face subset, node index, depth)
    /// items, with node indices assigned at enqueue time so parents can
    /// store final child references immediately. The split axis cycles
    /// x, y, z per tree depth level; each subset is sorted by triangle
    /// centroid along that axis and split at the median.
    ///
    /// Precondition (validated by the scene boundary): at least one face.
    pub fn build(positions: &[Vec3], faces: &[UVec3]) -> Self {
        debug_assert!(!faces.is_empty(), "BVH build needs at least one face");

        // A lone face has no split: both child slots reference the same leaf.
        if faces.len() == 1 {
            let tri_box = Aabb::from_triangle(&triangle_of(positions, faces, 0));
            return Self {
                nodes: vec![BvhNode {
                    left_box: tri_box,
                    right_box: tri_box,
                    left: 0,
                    right: 0,
                }],
            };
        }

        let mut nodes = vec![BvhNode::default()];

        let all: Vec<u32> = (0..faces.len() as u32).collect();
        let mut build_queue: VecDeque<(Vec<u32>, usize, u32)> = VecDeque::new();
        build_queue.push_back((all, 0, 0));

        while let Some((mut subset, node_idx, depth)) = build_queue.pop_front() {
            let axis = (depth % 3) as usize;

            subset.sort_unstable_by(|&a, &b| {
                let ca = triangle_of(positions, faces, a).centroid()[axis];
                let cb = triangle_of(positions, faces, b).centroid()[axis];
                ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
            });

            let mid = subset.len() / 2;
            let right_half = subset.split_off(mid);
            let left_half = subset;

            let tight_box = |half: &[u32]| {
                half.iter().fold(Aabb::INVALID, |acc, &f| {
                    acc.merge(&Aabb::from_triangle(&triangle_of(positions, faces, f)))
                })
            };
            nodes[node_idx].left_box = tight_box(&left_half);
            nodes[node_idx].right_box = tight_box(&right_half);

            if left_half.len() == 1 {
                nodes[node_idx].left = -(left_half[0] as i32);
            } else {
                let child = nodes.len() as i32;
                nodes[node_idx].left = child;
                build_queue.push_back((left_half, child as usize, depth + 1));
                nodes.push(BvhNode::default());
            }
            if right_half.len() == 1 {
                nodes[node_idx].right = -(right_half[0] as i32);
            } else {
                let child = nodes.len() as i32;
                nodes[node_idx].right = child;
                build_queue.push_back((right_half, child as usize, depth + 1));
                nodes.push(BvhNode::default());
            }
        }

        Self { nodes }
    }

    /// Number of nodes in the flat array.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the nearest triangle hit below `t_max`.
    ///
    /// Explores nodes through an explicit worklist. Both child boxes of a
    /// visited node are tested unconditionally; hit internal children are
    /// pushed, hit leaves run the exact triangle kernel and update the
    /// running nearest-hit record.
    ///
    /// Returns the face index and hit parameter, or `None` if nothing was
    /// struck within `t_max`.
    pub fn trace(
        &self,
        positions: &[Vec3],
        faces: &[UVec3],
        ray: &Ray,
        t_max: f32,
    ) -> Option<(u32, f32)> {
        let mut worklist = vec![0usize];

        let mut best_t = t_max;
        let mut best_face: Option<u32> = None;

        let mut visit_leaf = |face: u32, best_t: &mut f32, best_face: &mut Option<u32>| {
            let tri = triangle_of(positions, faces, face);
            if let Some(t) = intersect::ray_triangle(ray, &tri) {
                if t < *best_t {
                    *best_t = t;
                    *best_face = Some(face);
                }
            }
        };

        while let Some(node_idx) = worklist.pop() {
            let node = &self.nodes[node_idx];

            if intersect::ray_aabb(ray, &node.left_box).is_some() {
                if node.left > 0 {
                    worklist.push(node.left as usize);
                } else {
                    visit_leaf((-node.left) as u32, &mut best_t, &mut best_face);
                }
            }
            if intersect::ray_aabb(ray, &node.right_box).is_some() {
                if node.right > 0 {
                    worklist.push(node.right as usize);
                } else {
                    visit_leaf((-node.right) as u32, &mut best_t, &mut best_face);
                }
            }
        }

        best_face.map(|face| (face, best_t))
    }
}
