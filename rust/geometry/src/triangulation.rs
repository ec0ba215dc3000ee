// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon fan re-triangulation
//!
//! Clipped boundaries are always convex, so an angular sort around the
//! centroid in decal XY followed by a fan is enough.

use crate::clip::{Fragments, MAX_FRAGMENTS};
use crate::primitives::{Triangle, Vertex};
use crate::{Error, Point2, Result};

/// Arithmetic mean of the XY coordinates
#[inline]
fn centroid_xy(points: &[Vertex]) -> Point2<f64> {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), v| (sx + v.position.x, sy + v.position.y));
    Point2::new(sx / n, sy / n)
}

/// Sort points clockwise around their XY centroid (descending `atan2`)
pub fn sort_clockwise(points: &mut [Vertex]) {
    if points.is_empty() {
        return;
    }

    let center = centroid_xy(points);
    let angle = |v: &Vertex| (v.position.y - center.y).atan2(v.position.x - center.x);
    points.sort_by(|a, b| angle(b).total_cmp(&angle(a)));
}

/// Simple fan triangulation for convex polygons
#[inline]
pub fn fan_triangulate(n: usize) -> Vec<usize> {
    if n < 3 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Triangulate the unordered boundary of a clipped convex polygon
///
/// Points are reordered in place. Degenerate (zero-area) triangles from
/// collinear or repeated points are passed through. At most
/// [`MAX_FRAGMENTS`] triangles are emitted; any excess is dropped with a warning.
pub fn triangulate_boundary(points: &mut [Vertex]) -> Result<Fragments> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    sort_clockwise(points);

    let mut fragments = Fragments::new();
    for tri in fan_triangulate(n).chunks_exact(3) {
        if fragments.len() == MAX_FRAGMENTS {
            tracing::warn!(
                points = n,
                dropped = n - 2 - MAX_FRAGMENTS,
                "Clipped polygon exceeds fragment limit, dropping excess triangles"
            );
            break;
        }
        fragments.push(Triangle::new(points[tri[0]], points[tri[1]], points[tri[2]]));
    }

    Ok(fragments)
}
