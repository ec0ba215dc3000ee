// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry primitives used by the clipper
//!
//! Small value types carrying a position and an interpolated normal. All of
//! them live in decal-local space and are created fresh for every projection.

use nalgebra::{Point3, Vector3};

/// Coordinate axis of decal-local space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into `Point3` / `Vector3`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two remaining axes in cyclic order (X -> (Y, Z), Y -> (Z, X), Z -> (X, Y))
    #[inline]
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Vertex with position and normal
///
/// Two vertices are distinct values even when their positions coincide; the
/// clipper never welds them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
    /// Interpolated normal, not renormalized
    pub normal: Vector3<f64>,
}

impl Vertex {
    /// Create a new vertex
    #[inline]
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Position component along `axis`
    #[inline]
    pub fn coord(&self, axis: Axis) -> f64 {
        self.position[axis.index()]
    }
}

/// Directed edge between two vertices
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub a: Vertex,
    pub b: Vertex,
}

impl Edge {
    /// Create a new edge
    #[inline]
    pub fn new(a: Vertex, b: Vertex) -> Self {
        Self { a, b }
    }

    /// Evaluate the edge at parameter `t` (0 = a, 1 = b), interpolating the normal linearly
    #[inline]
    pub fn lerp(&self, t: f64) -> Vertex {
        Vertex {
            position: self.a.position + (self.b.position - self.a.position) * t,
            normal: self.a.normal + (self.b.normal - self.a.normal) * t,
        }
    }

    /// Solve for `t` where the `axis` coordinate equals `value`
    ///
    /// Returns `None` when the edge is parallel to the plane `axis = value`.
    #[inline]
    pub fn inverse_lerp(&self, axis: Axis, value: f64) -> Option<f64> {
        let start = self.a.coord(axis);
        let delta = self.b.coord(axis) - start;
        if delta == 0.0 {
            return None;
        }
        Some((value - start) / delta)
    }

    /// The two coordinates other than `axis` at parameter `t`, in `Axis::others` order
    #[inline]
    pub fn other_coords_at(&self, axis: Axis, t: f64) -> (f64, f64) {
        let (u, v) = axis.others();
        let at = |axis: Axis| {
            let start = self.a.coord(axis);
            start + (self.b.coord(axis) - start) * t
        };
        (at(u), at(v))
    }
}

/// Triangle with per-vertex normals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vertex,
    pub v1: Vertex,
    pub v2: Vertex,
}

/// Tolerance for barycentric containment of points lying on a triangle edge
const BARYCENTRIC_EPSILON: f64 = 1e-12;

impl Triangle {
    /// Create a new triangle
    #[inline]
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self { v0, v1, v2 }
    }

    /// Triangle whose vertices all carry its own unit face normal
    pub fn flat(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>) -> Self {
        let normal = (p1 - p0).cross(&(p2 - p0));
        let normal = normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        Self::new(
            Vertex::new(p0, normal),
            Vertex::new(p1, normal),
            Vertex::new(p2, normal),
        )
    }

    #[inline]
    pub fn vertices(&self) -> [Vertex; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Geometric face normal from the winding order (unnormalized)
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        let edge1 = self.v1.position - self.v0.position;
        let edge2 = self.v2.position - self.v0.position;
        edge1.cross(&edge2)
    }

    /// Calculate triangle area
    #[inline]
    pub fn area(&self) -> f64 {
        self.normal().norm() * 0.5
    }

    /// The three edges v0->v1, v1->v2, v2->v0
    #[inline]
    pub fn edges(&self) -> [Edge; 3] {
        [
            Edge::new(self.v0, self.v1),
            Edge::new(self.v1, self.v2),
            Edge::new(self.v2, self.v0),
        ]
    }

    /// Solve the triangle's plane for the `axis` coordinate, given the other two
    ///
    /// `u` and `v` are the coordinates along `axis.others()`. Returns `None` when
    /// the plane is parallel to `axis` (or the triangle is degenerate).
    pub fn solve_on_plane(&self, axis: Axis, u: f64, v: f64) -> Option<f64> {
        let normal = self.normal();
        let (u_axis, v_axis) = axis.others();
        let n_axis = normal[axis.index()];
        if n_axis.abs() <= f64::EPSILON * normal.norm() {
            return None;
        }

        let origin = &self.v0.position;
        let offset = normal[u_axis.index()] * (u - origin[u_axis.index()])
            + normal[v_axis.index()] * (v - origin[v_axis.index()]);
        Some(origin[axis.index()] - offset / n_axis)
    }

    /// Barycentric weights of a point assumed to lie on the triangle's plane
    pub fn barycentric(&self, point: &Point3<f64>) -> Option<Vector3<f64>> {
        let normal = self.normal();
        let denom = normal.norm_squared();
        if denom == 0.0 {
            return None;
        }

        let (p0, p1, p2) = (&self.v0.position, &self.v1.position, &self.v2.position);
        let w0 = normal.dot(&(p2 - p1).cross(&(point - p1))) / denom;
        let w1 = normal.dot(&(p0 - p2).cross(&(point - p2))) / denom;
        Some(Vector3::new(w0, w1, 1.0 - w0 - w1))
    }

    /// Check if a point on the triangle's plane lies inside it (edges inclusive)
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        self.barycentric(point)
            .map(|w| w.iter().all(|&c| c >= -BARYCENTRIC_EPSILON))
            .unwrap_or(false)
    }

    /// Interpolate the vertex normals at a point on the triangle's plane
    pub fn interpolate_normal(&self, point: &Point3<f64>) -> Vector3<f64> {
        match self.barycentric(point) {
            Some(w) => self.v0.normal * w.x + self.v1.normal * w.y + self.v2.normal * w.z,
            None => self.v0.normal,
        }
    }
}
