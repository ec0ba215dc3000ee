// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip region membership and crossing tests
//!
//! The clip region is fixed: the axis-aligned cube centered at the origin with
//! half-extent 0.5 on every axis.

use crate::primitives::{Axis, Edge, Triangle, Vertex};
use nalgebra::Point3;

/// Half-extent of the clip cube on each axis
pub const HALF_EXTENT: f64 = 0.5;

/// Face plane offsets on a single axis
pub const FACES: [f64; 2] = [-HALF_EXTENT, HALF_EXTENT];

/// Corners of the cube's square cross-section, as (u, v) pairs along `Axis::others`
pub const CORNERS: [(f64, f64); 4] = [
    (-HALF_EXTENT, -HALF_EXTENT),
    (HALF_EXTENT, -HALF_EXTENT),
    (HALF_EXTENT, HALF_EXTENT),
    (-HALF_EXTENT, HALF_EXTENT),
];

/// Point-in-region test, faces inclusive
#[inline]
pub fn contains_point(point: &Point3<f64>) -> bool {
    point.iter().all(|c| (-HALF_EXTENT..=HALF_EXTENT).contains(c))
}

#[inline]
fn strictly_inside(value: f64) -> bool {
    value > -HALF_EXTENT && value < HALF_EXTENT
}

/// Where `edge` crosses the face `axis = face`, if it does so within the face's extent
///
/// Touches at the edge endpoints (t = 0 or t = 1) are not crossings; original
/// vertices are collected separately. The emitted vertex lies exactly on the
/// face plane with its normal interpolated along the edge.
pub fn border_crossing(edge: &Edge, axis: Axis, face: f64) -> Option<Vertex> {
    let t = edge.inverse_lerp(axis, face)?;
    if !(t > 0.0 && t < 1.0) {
        return None;
    }

    let (u, v) = edge.other_coords_at(axis, t);
    if !strictly_inside(u) || !strictly_inside(v) {
        return None;
    }

    let mut crossing = edge.lerp(t);
    crossing.position[axis.index()] = face;
    Some(crossing)
}

/// Where the triangle's plane meets the cube edge running along `axis` at `corner`
///
/// The cube edge is the line with the two `axis.others()` coordinates fixed to
/// `corner`. A vertex is emitted only if the solved coordinate is strictly
/// inside the cube and the point lies on the triangle itself.
pub fn corner_crossing(triangle: &Triangle, axis: Axis, corner: (f64, f64)) -> Option<Vertex> {
    let value = triangle.solve_on_plane(axis, corner.0, corner.1)?;
    if !strictly_inside(value) {
        return None;
    }

    let (u, v) = axis.others();
    let mut position = Point3::origin();
    position[axis.index()] = value;
    position[u.index()] = corner.0;
    position[v.index()] = corner.1;

    if !triangle.contains_point(&position) {
        return None;
    }

    Some(Vertex::new(position, triangle.interpolate_normal(&position)))
}
