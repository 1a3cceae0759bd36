//! Flat-shaded vertex lists.
//!
//! The program has no index-aware normal smoothing; every triangle gets its
//! own three vertices carrying the face normal.

use anyhow::{Context, Result};
use glam::Vec3A;

use crate::render::Vertex;

/// Indexed triangle mesh in host memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuMesh {
    pub positions: Vec<Vec3A>,
    /// Triangle list; length should be a multiple of three.
    pub indices: Vec<usize>,
}

impl CpuMesh {
    pub fn new(positions: Vec<Vec3A>, indices: Vec<usize>) -> Self {
        Self { positions, indices }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expands the mesh into a non-indexed triangle list with face normals.
    ///
    /// Fails on the first out-of-range index. Trailing indices that do not
    /// form a triangle are dropped.
    pub fn flat_vertices(&self) -> Result<Vec<Vertex>> {
        if self.indices.len() % 3 != 0 {
            log_partial(self.indices.len());
        }

        let mut out = Vec::with_capacity(self.triangle_count() * 3);
        for (tri, idxs) in self.indices.chunks_exact(3).enumerate() {
            let [v0, v1, v2] = [idxs[0], idxs[1], idxs[2]].map(|i| {
                self.positions.get(i).copied().with_context(|| {
                    format!(
                        "triangle {tri}: index {i} out of range for {} positions",
                        self.positions.len()
                    )
                })
            });
            let (v0, v1, v2) = (v0?, v1?, v2?);
            push_triangle(&mut out, [v0, v1, v2]);
        }
        Ok(out)
    }
}

fn log_partial(len: usize) {
    log::warn!("mesh: {} trailing entries do not form a triangle; ignored", len % 3);
}

/// Builds flat-shaded vertices for an already non-indexed triangle list.
pub fn flat_normals(positions: &[Vec3A]) -> Vec<Vertex> {
    if positions.len() % 3 != 0 {
        log_partial(positions.len());
    }
    let mut out = Vec::with_capacity(positions.len() / 3 * 3);
    for tri in positions.chunks_exact(3) {
        push_triangle(&mut out, [tri[0], tri[1], tri[2]]);
    }
    out
}

/// `normalize((v1 - v0) x (v2 - v0))`; zero for degenerate triangles.
#[inline]
pub fn face_normal([v0, v1, v2]: [Vec3A; 3]) -> Vec3A {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

fn push_triangle(out: &mut Vec<Vertex>, tri: [Vec3A; 3]) {
    let n = face_normal(tri).to_array();
    out.extend(tri.map(|p| Vertex::new(p.to_array(), n)));
}
