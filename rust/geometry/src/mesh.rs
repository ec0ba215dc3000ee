// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Triangle mesh as handed over by the host (flat, f32)
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Build a mesh from flat buffers, checking their shape
    pub fn from_buffers(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "position buffer length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if normals.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "normal buffer length {} is not a multiple of 3",
                normals.len()
            )));
        }
        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Position of vertex `index`
    #[inline]
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        let chunk = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64))
    }

    /// Normal of vertex `index`
    #[inline]
    pub fn normal(&self, index: usize) -> Option<Vector3<f64>> {
        let chunk = self.normals.get(index * 3..index * 3 + 3)?;
        Some(Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64))
    }

    /// Whether every vertex has a normal
    #[inline]
    pub fn has_vertex_normals(&self) -> bool {
        self.normals.len() == self.positions.len()
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count (a trailing partial triangle is ignored)
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Index buffer in the narrowest format able to address the mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// True for the 32-bit format
    #[inline]
    pub fn is_wide(&self) -> bool {
        matches!(self, IndexBuffer::U32(_))
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(indices) => indices.len(),
            IndexBuffer::U32(indices) => indices.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at `position`, widened to u32
    #[inline]
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            IndexBuffer::U16(indices) => indices.get(position).map(|&i| i as u32),
            IndexBuffer::U32(indices) => indices.get(position).copied(),
        }
    }

    /// Iterate indices widened to u32
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            IndexBuffer::U16(indices) => Box::new(indices.iter().map(|&i| i as u32)),
            IndexBuffer::U32(indices) => Box::new(indices.iter().copied()),
        }
    }
}

impl Default for IndexBuffer {
    fn default() -> Self {
        IndexBuffer::U16(Vec::new())
    }
}

/// Decal mesh produced by a projection, in decal-local space
#[derive(Debug, Clone, Default)]
pub struct DecalMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v)
    pub uvs: Vec<f32>,
    /// Tangents (x, y, z, w); empty until the tangent pass has run
    pub tangents: Vec<f32>,
    /// Triangle indices
    pub indices: IndexBuffer,
}

impl DecalMesh {
    /// Whether the index buffer uses the 32-bit format
    #[inline]
    pub fn index_is_wide(&self) -> bool {
        self.indices.is_wide()
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `index`
    #[inline]
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        let chunk = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64))
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
        assert_eq!(mesh.position(0), Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(mesh.normal(1), None);
    }

    #[test]
    fn test_from_buffers_rejects_ragged_positions() {
        assert!(Mesh::from_buffers(vec![0.0; 4], vec![], vec![]).is_err());
        assert!(Mesh::from_buffers(vec![0.0; 3], vec![0.0; 2], vec![]).is_err());

        let mesh = Mesh::from_buffers(vec![0.0; 9], vec![], vec![0, 1, 2, 0]).unwrap();
        assert!(!mesh.has_vertex_normals());
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_index_buffer() {
        let narrow = IndexBuffer::U16(vec![0, 1, 2]);
        assert!(!narrow.is_wide());
        assert_eq!(narrow.get(2), Some(2));
        assert_eq!(narrow.iter().collect::<Vec<_>>(), vec![0, 1, 2]);

        let wide = IndexBuffer::U32(vec![70_000]);
        assert!(wide.is_wide());
        assert_eq!(wide.len(), 1);
        assert_eq!(wide.get(1), None);
    }

    #[test]
    fn test_decal_mesh_bounds() {
        let mesh = DecalMesh {
            positions: vec![-0.5, 0.0, 0.1, 0.25, 0.5, -0.2],
            ..Default::default()
        };
        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(-0.5, 0.0, -0.2));
        assert_eq!(max, Point3::new(0.25, 0.5, 0.1));
    }
}
