// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal triangle clipping
//!
//! Clips one decal-local triangle against the unit cube and re-triangulates
//! the surviving polygon. Every triangle is handled independently, so callers
//! can run this over a whole mesh in parallel.

use crate::primitives::{Axis, Triangle, Vertex};
use crate::region::{border_crossing, contains_point, corner_crossing, CORNERS, FACES};
use crate::triangulation::triangulate_boundary;
use smallvec::SmallVec;

/// Upper bound on fragments emitted for a single input triangle
pub const MAX_FRAGMENTS: usize = 5;

/// Output triangles of one clipped input triangle
pub type Fragments = SmallVec<[Triangle; MAX_FRAGMENTS]>;

/// Unordered boundary points of a clipped polygon
pub type BoundaryPoints = SmallVec<[Vertex; 12]>;

/// Corner-line points closer than this to an existing boundary point are dropped
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Boundary construction result for one triangle
#[derive(Debug, Clone)]
pub enum Boundary {
    /// Triangle faces away from the decal
    Culled,
    /// Triangle lies entirely inside the region and is kept unmodified
    Inside(Triangle),
    /// Unordered points bounding the clipped polygon (possibly empty)
    Points(BoundaryPoints),
}

/// Backface test: the decal projects along local -Z, so faces with a
/// non-negative Z normal component never receive it
#[inline]
pub fn is_backfacing(triangle: &Triangle) -> bool {
    triangle.normal().z >= 0.0
}

/// Collect the boundary point set of the portion of `triangle` inside the region
pub fn clip_boundary(triangle: &Triangle) -> Boundary {
    if is_backfacing(triangle) {
        return Boundary::Culled;
    }

    let mut points = BoundaryPoints::new();
    for vertex in triangle.vertices() {
        if contains_point(&vertex.position) {
            points.push(vertex);
        }
    }

    if points.len() == 3 {
        return Boundary::Inside(*triangle);
    }

    for axis in Axis::ALL {
        for corner in CORNERS {
            if let Some(vertex) = corner_crossing(triangle, axis, corner) {
                let coincident = points
                    .iter()
                    .any(|p| (p.position - vertex.position).norm() <= COINCIDENT_EPSILON);
                if !coincident {
                    points.push(vertex);
                }
            }
        }
    }

    for edge in triangle.edges() {
        for axis in Axis::ALL {
            for face in FACES {
                if let Some(vertex) = border_crossing(&edge, axis, face) {
                    points.push(vertex);
                }
            }
        }
    }

    Boundary::Points(points)
}

/// Clip a triangle against the unit cube
///
/// Returns up to [`MAX_FRAGMENTS`] triangles covering the part of `triangle`
/// inside the region, wound the same way as the input.
pub fn clip_triangle(triangle: &Triangle) -> Fragments {
    match clip_boundary(triangle) {
        Boundary::Culled => Fragments::new(),
        Boundary::Inside(original) => {
            let mut fragments = Fragments::new();
            fragments.push(original);
            fragments
        }
        Boundary::Points(mut points) => match points.len() {
            0 => Fragments::new(),
            1 | 2 => {
                tracing::warn!(
                    points = points.len(),
                    "Degenerate decal clip, triangle contributes no fragments"
                );
                Fragments::new()
            }
            _ => match triangulate_boundary(&mut points) {
                Ok(fragments) => fragments,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to triangulate clipped boundary");
                    Fragments::new()
                }
            },
        },
    }
}
