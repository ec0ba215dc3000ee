// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for projection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by decal projection
#[derive(Error, Debug)]
pub enum Error {
    #[error("No target meshes supplied for decal projection")]
    NoTargets,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Projection job failed: {0}")]
    JobFailed(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] decal_lite_geometry::Error),
}
