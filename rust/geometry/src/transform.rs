// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transform utilities for moving target geometry into decal-local space

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Combined matrix taking target-local coordinates into decal-local space
///
/// `world_to_decal` maps world space into the decal's unit-cube frame and
/// `local_to_world` is the target's own placement.
#[inline]
pub fn target_to_decal(world_to_decal: &Matrix4<f64>, local_to_world: &Matrix4<f64>) -> Matrix4<f64> {
    world_to_decal * local_to_world
}

/// Normal matrix: inverse-transpose of the linear part
///
/// Falls back to the linear part itself when it is singular.
pub fn normal_matrix(transform: &Matrix4<f64>) -> Matrix3<f64> {
    let linear: Matrix3<f64> = transform.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

/// Transform a point (with translation)
#[inline]
pub fn transform_point(transform: &Matrix4<f64>, point: &Point3<f64>) -> Point3<f64> {
    transform.transform_point(point)
}

/// Transform a normal with a precomputed normal matrix and renormalize it
///
/// Zero-length results are returned as-is.
#[inline]
pub fn transform_normal(normal_matrix: &Matrix3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    let transformed = normal_matrix * normal;
    transformed.try_normalize(0.0).unwrap_or(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_to_decal_composition() {
        let world_to_decal = Matrix4::new_scaling(0.5);
        let local_to_world = Matrix4::new_translation(&Vector3::new(2.0, 0.0, 0.0));
        let m = target_to_decal(&world_to_decal, &local_to_world);

        let p = transform_point(&m, &Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_normal_matrix_non_uniform_scale() {
        // Stretch x by 2: a 45° surface normal must tilt toward x after inverse-transpose
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let nm = normal_matrix(&m);

        let n = transform_normal(&nm, &Vector3::new(1.0, 1.0, 0.0).normalize());
        let expected = Vector3::new(0.5, 1.0, 0.0).normalize();
        assert_relative_eq!(n, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_normal_matrix_singular_falls_back() {
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, 0.0));
        let nm = normal_matrix(&m);
        assert_relative_eq!(nm, Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_preserves_normals() {
        let m = Matrix4::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let n = transform_normal(&normal_matrix(&m), &Vector3::x());
        assert_relative_eq!(n, Vector3::y(), epsilon = 1e-12);
    }
}
