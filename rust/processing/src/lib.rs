// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal-Lite projection pipeline
//!
//! Brings target meshes into the decal's local frame, clips every triangle
//! against the unit cube in parallel and assembles one decal mesh, either
//! synchronously ([`project_decal`]) or as a polled background job
//! ([`ProjectionJob`]).

pub mod config;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod target;

pub use config::ProjectionConfig;
pub use error::{Error, Result};
pub use job::ProjectionJob;
pub use pipeline::project_decal;
pub use target::{prepare_target, LocalTriangles, TargetMesh};

pub use decal_lite_geometry::{DecalMesh, IndexBuffer, IndexLimits, Matrix4, Mesh};
