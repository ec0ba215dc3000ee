// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target meshes and their preparation into decal-local triangles
//!
//! Preparation runs on the calling thread; the resulting buffers are owned
//! values that can be moved into clipping work.

use decal_lite_geometry::transform::{normal_matrix, target_to_decal, transform_normal, transform_point};
use decal_lite_geometry::{Matrix4, Mesh, Point3, Triangle, Vector3, Vertex};

use crate::Result;

/// A mesh receiving the decal, with its local-to-world placement
#[derive(Debug, Clone)]
pub struct TargetMesh {
    pub mesh: Mesh,
    /// Local-to-world transform
    pub transform: Matrix4<f64>,
}

impl TargetMesh {
    /// Create a new target
    pub fn new(mesh: Mesh, transform: Matrix4<f64>) -> Self {
        Self { mesh, transform }
    }

    /// Target whose local space is world space
    pub fn in_world(mesh: Mesh) -> Self {
        Self::new(mesh, Matrix4::identity())
    }

    /// Build a target from raw host buffers (xyz triples and triangle indices)
    pub fn from_buffers(
        positions: Vec<f32>,
        normals: Vec<f32>,
        indices: Vec<u32>,
        transform: Matrix4<f64>,
    ) -> Result<Self> {
        let mesh = Mesh::from_buffers(positions, normals, indices)?;
        Ok(Self::new(mesh, transform))
    }
}

/// Triangles of one target in decal-local space
#[derive(Debug, Clone, Default)]
pub struct LocalTriangles {
    pub triangles: Vec<Triangle>,
    /// Triangles dropped for referencing missing vertices
    pub skipped: usize,
}

impl LocalTriangles {
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Transform a target into decal-local space and split it into triangles
///
/// Normals go through the inverse-transpose and are renormalized. When the
/// normal buffer does not cover every vertex, face normals are used instead.
/// Mirroring transforms flip the winding back so front faces stay front faces.
pub fn prepare_target(target: &TargetMesh, decal_transform: &Matrix4<f64>) -> LocalTriangles {
    let mesh = &target.mesh;
    let transform = target_to_decal(decal_transform, &target.transform);
    let normals_transform = normal_matrix(&transform);
    let mirrored = transform.fixed_view::<3, 3>(0, 0).into_owned().determinant() < 0.0;

    let positions: Vec<Point3<f64>> = mesh
        .positions
        .chunks_exact(3)
        .map(|c| transform_point(&transform, &Point3::new(c[0] as f64, c[1] as f64, c[2] as f64)))
        .collect();

    let normals: Option<Vec<Vector3<f64>>> = if mesh.has_vertex_normals() {
        Some(
            mesh.normals
                .chunks_exact(3)
                .map(|c| {
                    transform_normal(&normals_transform, &Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64))
                })
                .collect(),
        )
    } else {
        if mesh.triangle_count() > 0 {
            tracing::warn!(
                positions = mesh.positions.len(),
                normals = mesh.normals.len(),
                "Normal buffer does not match positions, using face normals"
            );
        }
        None
    };

    let mut local = LocalTriangles {
        triangles: Vec::with_capacity(mesh.triangle_count()),
        skipped: 0,
    };

    for tri in mesh.indices.chunks_exact(3) {
        let (i0, mut i1, mut i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            local.skipped += 1;
            continue;
        }
        if mirrored {
            std::mem::swap(&mut i1, &mut i2);
        }

        let triangle = match &normals {
            Some(normals) => Triangle::new(
                Vertex::new(positions[i0], normals[i0]),
                Vertex::new(positions[i1], normals[i1]),
                Vertex::new(positions[i2], normals[i2]),
            ),
            None => Triangle::flat(positions[i0], positions[i1], positions[i2]),
        };
        local.triangles.push(triangle);
    }

    if local.skipped > 0 {
        tracing::warn!(
            skipped = local.skipped,
            vertices = positions.len(),
            "Skipped triangles with out-of-range indices"
        );
    }

    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_mesh() -> Mesh {
        // Clockwise in XY, normals facing the decal (-Z)
        let mut mesh = Mesh::new();
        for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.add_vertex(Point3::new(x, y, 0.0), -Vector3::z());
        }
        mesh.add_triangle(0, 2, 1);
        mesh.add_triangle(0, 3, 2);
        mesh
    }

    #[test]
    fn test_prepare_applies_both_transforms() {
        let target = TargetMesh::new(
            quad_mesh(),
            Matrix4::new_translation(&Vector3::new(4.0, 0.0, 0.0)),
        );
        // Decal centered at x = 4, twice the unit size
        let decal = Matrix4::new_scaling(0.5) * Matrix4::new_translation(&Vector3::new(-4.0, 0.0, 0.0));

        let local = prepare_target(&target, &decal);
        assert_eq!(local.len(), 2);
        assert_eq!(local.skipped, 0);
        assert_relative_eq!(local.triangles[0].v0.position, Point3::new(-0.5, -0.5, 0.0));
        assert_relative_eq!(local.triangles[0].v1.position, Point3::new(0.5, 0.5, 0.0));
        assert_relative_eq!(local.triangles[0].v0.normal, -Vector3::z());
        assert!(local.triangles[0].normal().z < 0.0);
    }

    #[test]
    fn test_from_buffers() {
        let target = TargetMesh::from_buffers(
            vec![0.0, 0.0, 0.0, 0.0, 0.25, 0.0, 0.25, 0.0, 0.0],
            vec![0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0],
            vec![0, 1, 2],
            Matrix4::identity(),
        )
        .unwrap();
        assert_eq!(prepare_target(&target, &Matrix4::identity()).len(), 1);

        let result = TargetMesh::from_buffers(vec![0.0; 4], vec![], vec![], Matrix4::identity());
        assert!(matches!(
            result,
            Err(crate::Error::Geometry(decal_lite_geometry::Error::InvalidMesh(_)))
        ));
    }

    #[test]
    fn test_prepare_skips_out_of_range_triangles() {
        let mut mesh = quad_mesh();
        mesh.add_triangle(0, 1, 9);
        mesh.indices.push(0);

        let local = prepare_target(&TargetMesh::in_world(mesh), &Matrix4::identity());
        assert_eq!(local.len(), 2);
        assert_eq!(local.skipped, 1);
    }

    #[test]
    fn test_prepare_falls_back_to_face_normals() {
        let mut mesh = quad_mesh();
        mesh.normals.truncate(6);

        let local = prepare_target(&TargetMesh::in_world(mesh), &Matrix4::identity());
        for tri in &local.triangles {
            assert_relative_eq!(tri.v0.normal, -Vector3::z());
        }
    }

    #[test]
    fn test_prepare_keeps_front_faces_under_mirroring() {
        let target = TargetMesh::new(
            quad_mesh(),
            Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0)),
        );
        let local = prepare_target(&target, &Matrix4::identity());
        for tri in &local.triangles {
            assert!(tri.normal().z < 0.0);
            assert_relative_eq!(tri.v0.normal, -Vector3::z());
        }
    }
}
