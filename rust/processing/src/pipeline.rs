// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synchronous decal projection

use crate::config::ProjectionConfig;
use crate::error::{Error, Result};
use crate::target::{prepare_target, TargetMesh};
use decal_lite_geometry::{
    assemble_decal_mesh, clip_triangle, compute_tangents, DecalMesh, Fragments, Matrix4, Triangle,
};

/// Clip triangles one slot per input triangle, preserving input order
///
/// Runs on the current rayon pool when `parallel` is set.
#[cfg(not(target_arch = "wasm32"))]
pub fn clip_fragments(triangles: &[Triangle], parallel: bool) -> Vec<Fragments> {
    use rayon::prelude::*;

    if parallel {
        triangles.par_iter().map(clip_triangle).collect()
    } else {
        triangles.iter().map(clip_triangle).collect()
    }
}

/// Clip triangles one slot per input triangle, preserving input order
///
/// No threads on WASM: always sequential.
#[cfg(target_arch = "wasm32")]
pub fn clip_fragments(triangles: &[Triangle], _parallel: bool) -> Vec<Fragments> {
    triangles.iter().map(clip_triangle).collect()
}

/// Build a dedicated rayon pool with `threads` workers
pub fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("decal-clip-{}", i))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn clip_on_pool(triangles: &[Triangle], threads: usize) -> Result<Vec<Fragments>> {
    let pool = build_pool(threads)?;
    Ok(pool.install(|| clip_fragments(triangles, true)))
}

#[cfg(target_arch = "wasm32")]
fn clip_on_pool(triangles: &[Triangle], _threads: usize) -> Result<Vec<Fragments>> {
    Ok(clip_fragments(triangles, false))
}

/// Clip triangles according to `config`, on a dedicated pool if one is configured
pub fn clip_all(triangles: &[Triangle], config: &ProjectionConfig) -> Result<Vec<Fragments>> {
    let parallel = config.use_parallel(triangles.len());
    match config.worker_threads {
        Some(threads) if parallel => clip_on_pool(triangles, threads),
        _ => Ok(clip_fragments(triangles, parallel)),
    }
}

/// Assemble clipped fragments and run the configured post-passes
pub fn finish_mesh(fragments: &[Fragments], config: &ProjectionConfig) -> DecalMesh {
    let mut mesh = assemble_decal_mesh(fragments, &config.index_limits);
    if config.compute_tangents {
        compute_tangents(&mut mesh);
    }
    mesh
}

/// Project a decal onto a set of target meshes
///
/// `decal_transform` maps world space into the decal's local frame, where the
/// projection volume is the centered unit cube. The result is a single mesh in
/// decal-local space. Fails only when `targets` is empty.
pub fn project_decal(
    targets: &[TargetMesh],
    decal_transform: &Matrix4<f64>,
    config: &ProjectionConfig,
) -> Result<DecalMesh> {
    if targets.is_empty() {
        return Err(Error::NoTargets);
    }

    // PHASE 1: Sequential - bring every target into decal-local space
    let mut triangles: Vec<Triangle> = Vec::new();
    for target in targets {
        let local = prepare_target(target, decal_transform);
        triangles.extend(local.triangles);
    }

    tracing::debug!(
        targets = targets.len(),
        triangles = triangles.len(),
        parallel = config.use_parallel(triangles.len()),
        "Clipping decal triangles"
    );

    // PHASE 2: Independent per-triangle clipping
    let fragments = clip_all(&triangles, config)?;

    // PHASE 3: Concatenate into the output mesh
    let mesh = finish_mesh(&fragments, config);

    tracing::info!(
        targets = targets.len(),
        input_triangles = triangles.len(),
        output_triangles = mesh.triangle_count(),
        wide_indices = mesh.index_is_wide(),
        "Decal projection complete"
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal_lite_geometry::Point3;

    #[test]
    fn test_empty_targets_is_an_error() {
        let result = project_decal(&[], &Matrix4::identity(), &ProjectionConfig::default());
        assert!(matches!(result, Err(Error::NoTargets)));
    }

    #[test]
    fn test_clip_fragments_keeps_slot_order() {
        let inside = Triangle::flat(
            Point3::new(-0.1, -0.1, 0.0),
            Point3::new(-0.1, 0.1, 0.0),
            Point3::new(0.1, -0.1, 0.0),
        );
        let outside = Triangle::flat(
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(2.0, 2.1, 0.0),
            Point3::new(2.1, 2.0, 0.0),
        );
        let triangles = vec![inside, outside, inside];

        for parallel in [false, true] {
            let slots = clip_fragments(&triangles, parallel);
            assert_eq!(slots.len(), 3);
            assert_eq!(slots[0].len(), 1);
            assert!(slots[1].is_empty());
            assert_eq!(slots[2][0], inside);
        }
    }

    #[test]
    fn test_finish_mesh_respects_tangent_flag() {
        let tri = Triangle::flat(
            Point3::new(-0.1, -0.1, 0.0),
            Point3::new(-0.1, 0.1, 0.0),
            Point3::new(0.1, -0.1, 0.0),
        );
        let fragments = clip_fragments(&[tri], false);

        let with = finish_mesh(&fragments, &ProjectionConfig::default());
        assert_eq!(with.tangents.len(), 12);

        let without = finish_mesh(
            &fragments,
            &ProjectionConfig {
                compute_tangents: false,
                ..Default::default()
            },
        );
        assert!(without.tangents.is_empty());
    }
}
