// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal mesh assembly
//!
//! Concatenates clipped fragments into one unwelded mesh: every fragment
//! triangle contributes three fresh vertices, indexed positionally.

use crate::clip::Fragments;
use crate::mesh::{DecalMesh, IndexBuffer};
use crate::primitives::{Triangle, Vertex};
use crate::region::HALF_EXTENT;

/// Largest vertex count addressed with 16-bit indices (headroom below `u16::MAX`)
pub const MAX_NARROW_VERTICES: usize = 65_534;

/// Largest vertex count the renderer can address with wide indices
pub const MAX_WIDE_VERTICES: usize = i32::MAX as usize;

/// Vertex-count limits driving index width selection and truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLimits {
    /// Above this vertex count the index buffer switches to 32-bit
    pub narrow_max_vertices: usize,
    /// Above this vertex count excess triangles are discarded
    pub wide_max_vertices: usize,
}

impl Default for IndexLimits {
    fn default() -> Self {
        Self {
            narrow_max_vertices: MAX_NARROW_VERTICES,
            wide_max_vertices: MAX_WIDE_VERTICES,
        }
    }
}

impl IndexLimits {
    /// Narrow limit, capped to what 16-bit indices can address
    #[inline]
    pub fn effective_narrow_max(&self) -> usize {
        self.narrow_max_vertices.min(MAX_NARROW_VERTICES)
    }

    /// Wide limit, capped to what 32-bit indices can address
    #[inline]
    pub fn effective_wide_max(&self) -> usize {
        self.wide_max_vertices.min(MAX_WIDE_VERTICES)
    }

    /// Maximum number of triangles that fit the wide format
    #[inline]
    pub fn max_triangles(&self) -> usize {
        self.effective_wide_max() / 3
    }
}

/// Decal texture coordinate for a decal-local position: local XY mapped to [0,1]²
#[inline]
pub fn decal_uv(vertex: &Vertex) -> [f32; 2] {
    [
        (vertex.position.x + HALF_EXTENT) as f32,
        (vertex.position.y + HALF_EXTENT) as f32,
    ]
}

/// Assemble fragments from any number of clipped triangles into a decal mesh
///
/// Normals are normalized on output. If the fragment count exceeds
/// `limits.max_triangles()` the excess is dropped with a warning.
pub fn assemble_decal_mesh(fragments: &[Fragments], limits: &IndexLimits) -> DecalMesh {
    let triangles: Vec<&Triangle> = fragments.iter().flatten().collect();
    assemble_triangles(&triangles, limits)
}

/// Assemble an already flattened triangle list into a decal mesh
pub fn assemble_triangles(triangles: &[&Triangle], limits: &IndexLimits) -> DecalMesh {
    let max_triangles = limits.max_triangles();
    let kept = if triangles.len() > max_triangles {
        tracing::warn!(
            triangles = triangles.len(),
            kept = max_triangles,
            "Decal mesh exceeds index capacity, truncating triangles"
        );
        &triangles[..max_triangles]
    } else {
        triangles
    };

    let vertex_count = kept.len() * 3;
    let wide = vertex_count > limits.effective_narrow_max();

    let mut mesh = DecalMesh {
        positions: Vec::with_capacity(vertex_count * 3),
        normals: Vec::with_capacity(vertex_count * 3),
        uvs: Vec::with_capacity(vertex_count * 2),
        tangents: Vec::new(),
        indices: if wide {
            IndexBuffer::U32((0..vertex_count as u32).collect())
        } else {
            IndexBuffer::U16((0..vertex_count as u16).collect())
        },
    };

    for vertex in kept.iter().flat_map(|t| t.vertices()) {
        let p = vertex.position;
        mesh.positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);

        let n = vertex.normal.try_normalize(0.0).unwrap_or(vertex.normal);
        mesh.normals.extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);

        mesh.uvs.extend_from_slice(&decal_uv(&vertex));
    }

    tracing::debug!(
        triangles = kept.len(),
        vertices = vertex_count,
        wide_indices = wide,
        "Assembled decal mesh"
    );

    mesh
}
