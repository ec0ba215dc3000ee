// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmarks for decal projection throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use decal_lite_geometry::{Point3, Vector3};
use decal_lite_processing::{project_decal, Matrix4, Mesh, ProjectionConfig, TargetMesh};

/// Flat grid facing the decal, spanning [-1, 1]² so roughly three quarters are clipped away
fn grid_target(cells: usize) -> TargetMesh {
    let step = 2.0 / cells as f64;
    let mut mesh = Mesh::with_capacity((cells + 1) * (cells + 1), cells * cells * 6);
    for j in 0..=cells {
        for i in 0..=cells {
            let x = -1.0 + step * i as f64;
            let y = -1.0 + step * j as f64;
            let z = 0.2 * (x * 3.0).sin() * (y * 2.0).cos();
            mesh.add_vertex(Point3::new(x, y, z), -Vector3::z());
        }
    }
    let row = (cells + 1) as u32;
    for j in 0..cells as u32 {
        for i in 0..cells as u32 {
            let a = j * row + i;
            mesh.add_triangle(a, a + row + 1, a + 1);
            mesh.add_triangle(a, a + row, a + row + 1);
        }
    }
    TargetMesh::in_world(mesh)
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_decal");

    for cells in [32usize, 128, 256] {
        let targets = vec![grid_target(cells)];
        let triangles = (cells * cells * 2) as u64;
        group.throughput(Throughput::Elements(triangles));

        let sequential = ProjectionConfig {
            parallel: false,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("sequential", cells), &targets, |b, targets| {
            b.iter(|| project_decal(black_box(targets), &Matrix4::identity(), &sequential))
        });

        let parallel = ProjectionConfig::default();
        group.bench_with_input(BenchmarkId::new("parallel", cells), &targets, |b, targets| {
            b.iter(|| project_decal(black_box(targets), &Matrix4::identity(), &parallel))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
