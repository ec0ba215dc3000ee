// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection configuration loaded from defaults or environment variables.

use decal_lite_geometry::assembly::{IndexLimits, MAX_NARROW_VERTICES, MAX_WIDE_VERTICES};

/// Projection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Clip triangles on the rayon pool.
    pub parallel: bool,
    /// Below this many input triangles clipping stays sequential.
    pub min_parallel_triangles: usize,
    /// Size of a dedicated worker pool; `None` uses the global rayon pool.
    pub worker_threads: Option<usize>,
    /// Run the tangent post-pass on the assembled mesh.
    pub compute_tangents: bool,
    /// Index width selection and truncation limits.
    pub index_limits: IndexLimits,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_triangles: 256,
            worker_threads: None,
            compute_tangents: true,
            index_limits: IndexLimits::default(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ProjectionConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            parallel: lookup("DECAL_PARALLEL")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.parallel),
            min_parallel_triangles: lookup("DECAL_MIN_PARALLEL_TRIANGLES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.min_parallel_triangles),
            worker_threads: lookup("DECAL_WORKER_THREADS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&n: &usize| n > 0),
            compute_tangents: lookup("DECAL_COMPUTE_TANGENTS")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.compute_tangents),
            index_limits: IndexLimits {
                narrow_max_vertices: lookup("DECAL_MAX_NARROW_VERTICES")
                    .and_then(|v| v.trim().parse().ok())
                    .map_or(MAX_NARROW_VERTICES, |n: usize| n.min(MAX_NARROW_VERTICES)),
                wide_max_vertices: lookup("DECAL_MAX_WIDE_VERTICES")
                    .and_then(|v| v.trim().parse().ok())
                    .map_or(MAX_WIDE_VERTICES, |n: usize| n.min(MAX_WIDE_VERTICES)),
            },
        }
    }

    /// Whether `triangle_count` triangles should be clipped in parallel.
    #[inline]
    pub fn use_parallel(&self, triangle_count: usize) -> bool {
        self.parallel && triangle_count >= self.min_parallel_triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ProjectionConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ProjectionConfig::default());
        assert_eq!(config.index_limits.narrow_max_vertices, 65_534);
    }

    #[test]
    fn test_overrides() {
        let config = ProjectionConfig::from_lookup(lookup(&[
            ("DECAL_PARALLEL", "off"),
            ("DECAL_MIN_PARALLEL_TRIANGLES", "10"),
            ("DECAL_WORKER_THREADS", "3"),
            ("DECAL_COMPUTE_TANGENTS", "0"),
            ("DECAL_MAX_NARROW_VERTICES", "300"),
            ("DECAL_MAX_WIDE_VERTICES", "9000"),
        ]));
        assert!(!config.parallel);
        assert_eq!(config.min_parallel_triangles, 10);
        assert_eq!(config.worker_threads, Some(3));
        assert!(!config.compute_tangents);
        assert_eq!(config.index_limits.narrow_max_vertices, 300);
        assert_eq!(config.index_limits.wide_max_vertices, 9000);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ProjectionConfig::from_lookup(lookup(&[
            ("DECAL_PARALLEL", "maybe"),
            ("DECAL_MIN_PARALLEL_TRIANGLES", "-4"),
            ("DECAL_WORKER_THREADS", "0"),
        ]));
        assert!(config.parallel);
        assert_eq!(config.min_parallel_triangles, 256);
        assert_eq!(config.worker_threads, None);
    }

    #[test]
    fn test_index_limits_are_clamped() {
        let config = ProjectionConfig::from_lookup(lookup(&[
            ("DECAL_MAX_NARROW_VERTICES", "100000"),
            ("DECAL_MAX_WIDE_VERTICES", "99999999999"),
        ]));
        assert_eq!(config.index_limits.narrow_max_vertices, MAX_NARROW_VERTICES);
        assert_eq!(config.index_limits.wide_max_vertices, MAX_WIDE_VERTICES);
    }

    #[test]
    fn test_use_parallel_threshold() {
        let config = ProjectionConfig::default();
        assert!(!config.use_parallel(255));
        assert!(config.use_parallel(256));

        let sequential = ProjectionConfig {
            parallel: false,
            ..Default::default()
        };
        assert!(!sequential.use_parallel(1_000_000));
    }
}
