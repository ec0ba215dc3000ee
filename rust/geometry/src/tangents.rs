// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tangent-space post-pass for assembled decal meshes

use crate::mesh::DecalMesh;
use crate::{Point2, Point3, Vector3};

#[inline]
fn read3(buffer: &[f32], index: usize) -> Vector3<f64> {
    Vector3::new(
        buffer[index * 3] as f64,
        buffer[index * 3 + 1] as f64,
        buffer[index * 3 + 2] as f64,
    )
}

#[inline]
fn read_uv(buffer: &[f32], index: usize) -> Point2<f64> {
    Point2::new(buffer[index * 2] as f64, buffer[index * 2 + 1] as f64)
}

/// Any unit vector perpendicular to `normal`, for vertices without a usable UV gradient
fn fallback_tangent(normal: &Vector3<f64>) -> Vector3<f64> {
    let reference = if normal.x.abs() >= normal.y.abs() && normal.x.abs() >= normal.z.abs() {
        Vector3::y()
    } else {
        Vector3::x()
    };
    (reference - normal * normal.dot(&reference))
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::x)
}

/// Compute per-vertex tangents (x, y, z, handedness) from UV gradients
///
/// Tangent and bitangent are accumulated per triangle, then each vertex
/// tangent is Gram-Schmidt orthonormalized against the vertex normal. The
/// handedness is -1 when `cross(n, t)` opposes the accumulated bitangent.
pub fn compute_tangents(mesh: &mut DecalMesh) {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 || mesh.uvs.len() < vertex_count * 2 || mesh.normals.len() < vertex_count * 3 {
        mesh.tangents.clear();
        return;
    }

    let mut tan1 = vec![Vector3::<f64>::zeros(); vertex_count];
    let mut tan2 = vec![Vector3::<f64>::zeros(); vertex_count];

    let indices: Vec<usize> = mesh.indices.iter().map(|i| i as usize).collect();
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }

        let p0 = Point3::from(read3(&mesh.positions, i0));
        let dp1 = Point3::from(read3(&mesh.positions, i1)) - p0;
        let dp2 = Point3::from(read3(&mesh.positions, i2)) - p0;

        let uv0 = read_uv(&mesh.uvs, i0);
        let duv1 = read_uv(&mesh.uvs, i1) - uv0;
        let duv2 = read_uv(&mesh.uvs, i2) - uv0;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-12 {
            continue;
        }

        let r = 1.0 / det;
        let sdir = (dp1 * duv2.y - dp2 * duv1.y) * r;
        let tdir = (dp2 * duv1.x - dp1 * duv2.x) * r;

        for &i in tri {
            tan1[i] += sdir;
            tan2[i] += tdir;
        }
    }

    mesh.tangents.clear();
    mesh.tangents.reserve(vertex_count * 4);
    for i in 0..vertex_count {
        let n = read3(&mesh.normals, i);
        let t = tan1[i];

        let ortho = (t - n * n.dot(&t)).try_normalize(1e-12);
        let (tangent, w) = match ortho {
            Some(tangent) => {
                let w = if n.cross(&t).dot(&tan2[i]) < 0.0 { -1.0 } else { 1.0 };
                (tangent, w)
            }
            None => (fallback_tangent(&n), 1.0),
        };

        mesh.tangents
            .extend_from_slice(&[tangent.x as f32, tangent.y as f32, tangent.z as f32, w]);
    }
}
