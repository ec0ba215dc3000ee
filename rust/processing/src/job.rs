// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background decal projection, polled across ticks
//!
//! Every target is prepared on the calling thread and then clipped by its own
//! background task. The task owns the target's decal-local buffer, so that
//! buffer is released only once its clipping has finished. Completion is
//! tracked per target and the mesh is assembled when all of them are done.

use crate::config::ProjectionConfig;
use crate::error::{Error, Result};
use crate::pipeline::{build_pool, clip_fragments, finish_mesh};
use crate::target::{prepare_target, LocalTriangles, TargetMesh};
use decal_lite_geometry::{DecalMesh, Fragments, Matrix4};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

type TargetResult = (usize, Vec<Fragments>);

/// In-flight projection over a set of targets
pub struct ProjectionJob {
    receiver: Receiver<TargetResult>,
    results: Vec<Option<Vec<Fragments>>>,
    completed: usize,
    delivered: bool,
    config: ProjectionConfig,
    _pool: Option<rayon::ThreadPool>,
}

#[cfg(not(target_arch = "wasm32"))]
fn dispatch<F: FnOnce() + Send + 'static>(pool: Option<&rayon::ThreadPool>, task: F) {
    match pool {
        Some(pool) => pool.spawn(task),
        None => rayon::spawn(task),
    }
}

/// No threads on WASM: the task runs to completion immediately
#[cfg(target_arch = "wasm32")]
fn dispatch<F: FnOnce() + Send + 'static>(_pool: Option<&rayon::ThreadPool>, task: F) {
    task()
}

fn clip_target(index: usize, local: LocalTriangles, parallel: bool, sender: Sender<TargetResult>) {
    let fragments = clip_fragments(&local.triangles, parallel);
    drop(local);
    // Receiver gone means the job was abandoned; nothing left to report to
    let _ = sender.send((index, fragments));
}

impl ProjectionJob {
    /// Prepare all targets and start clipping them in the background
    ///
    /// Fails only when `targets` is empty (or a configured worker pool cannot be built).
    pub fn spawn(
        targets: Vec<TargetMesh>,
        decal_transform: &Matrix4<f64>,
        config: ProjectionConfig,
    ) -> Result<Self> {
        if targets.is_empty() {
            return Err(Error::NoTargets);
        }

        let pool = match config.worker_threads {
            Some(threads) if !cfg!(target_arch = "wasm32") => Some(build_pool(threads)?),
            _ => None,
        };

        let (sender, receiver) = mpsc::channel();
        let total = targets.len();

        for (index, target) in targets.iter().enumerate() {
            let local = prepare_target(target, decal_transform);
            let parallel = config.use_parallel(local.len());
            let sender = sender.clone();

            tracing::debug!(target_index = index, triangles = local.len(), "Dispatching decal clip job");

            dispatch(pool.as_ref(), move || clip_target(index, local, parallel, sender));
        }

        Ok(Self {
            receiver,
            results: vec![None; total],
            completed: 0,
            delivered: false,
            config,
            _pool: pool,
        })
    }

    /// Number of targets in this job
    #[inline]
    pub fn total_targets(&self) -> usize {
        self.results.len()
    }

    /// Number of targets whose clipping has finished
    #[inline]
    pub fn completed_targets(&self) -> usize {
        self.completed
    }

    /// Whether every target has finished clipping
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed == self.results.len()
    }

    fn record(&mut self, (index, fragments): TargetResult) {
        if let Some(slot) = self.results.get_mut(index) {
            if slot.is_none() {
                self.completed += 1;
            }
            *slot = Some(fragments);
        }
    }

    fn lost(&self) -> Error {
        Error::JobFailed(format!(
            "{} of {} targets never completed",
            self.results.len() - self.completed,
            self.results.len()
        ))
    }

    fn assemble(&mut self) -> DecalMesh {
        let fragments: Vec<Fragments> = self
            .results
            .iter_mut()
            .filter_map(Option::take)
            .flatten()
            .collect();
        self.delivered = true;

        let mesh = finish_mesh(&fragments, &self.config);
        tracing::info!(
            targets = self.results.len(),
            output_triangles = mesh.triangle_count(),
            wide_indices = mesh.index_is_wide(),
            "Decal projection job complete"
        );
        mesh
    }

    /// Check for finished targets without blocking
    ///
    /// Returns the assembled mesh exactly once, on the first poll after every
    /// target has completed; `None` before that and afterwards.
    pub fn poll(&mut self) -> Result<Option<DecalMesh>> {
        if self.delivered {
            return Ok(None);
        }

        while !self.is_complete() {
            match self.receiver.try_recv() {
                Ok(result) => self.record(result),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(self.lost()),
            }
        }

        Ok(Some(self.assemble()))
    }

    /// Block until every target has completed and return the mesh
    pub fn wait(mut self) -> Result<DecalMesh> {
        if self.delivered {
            return Err(Error::JobFailed("mesh was already taken by poll".to_string()));
        }

        while !self.is_complete() {
            match self.receiver.recv() {
                Ok(result) => self.record(result),
                Err(_) => return Err(self.lost()),
            }
        }

        Ok(self.assemble())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_without_targets_fails() {
        let result = ProjectionJob::spawn(Vec::new(), &Matrix4::identity(), ProjectionConfig::default());
        assert!(matches!(result, Err(Error::NoTargets)));
    }

    #[test]
    fn test_record_ignores_duplicates() {
        let (_sender, receiver) = mpsc::channel();
        let mut job = ProjectionJob {
            receiver,
            results: vec![None, None],
            completed: 0,
            delivered: false,
            config: ProjectionConfig::default(),
            _pool: None,
        };

        job.record((1, Vec::new()));
        job.record((1, Vec::new()));
        job.record((7, Vec::new()));
        assert_eq!(job.completed_targets(), 1);
        assert!(!job.is_complete());
        assert!(job.poll().unwrap().is_none());
    }
}
