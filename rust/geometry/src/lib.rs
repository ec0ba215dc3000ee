// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal-Lite Geometry Processing
//!
//! Clips triangles against the decal's unit cube, fans the surviving convex
//! polygons back into triangles and assembles the decal mesh.

pub mod primitives;
pub mod region;
pub mod clip;
pub mod triangulation;
pub mod mesh;
pub mod assembly;
pub mod tangents;
pub mod transform;
pub mod error;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use primitives::{Axis, Edge, Triangle, Vertex};
pub use clip::{clip_triangle, Fragments, MAX_FRAGMENTS};
pub use mesh::{DecalMesh, IndexBuffer, Mesh};
pub use assembly::{assemble_decal_mesh, IndexLimits};
pub use tangents::compute_tangents;
