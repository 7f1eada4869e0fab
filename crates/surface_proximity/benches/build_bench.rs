//! Benchmarks for index construction on generated box meshes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::DVec3;
use surface_proximity::geometry::generation::box_mesh;
use surface_proximity::{build_index, BuildMode, GeometryOracle, ProximityConfig, TetMesh};

/// Cube split into `n³` cells, 6 tetrahedra each.
fn cube(n: usize) -> TetMesh {
  box_mesh([n, n, n], DVec3::ONE).expect("box mesh")
}

/// BFS build over increasing mesh resolution with a fixed physical depth.
fn bench_bfs_resolution(c: &mut Criterion) {
  let mut group = c.benchmark_group("bfs_resolution");
  let config = ProximityConfig::default().with_depth(0.1);

  for n in [4, 8, 12] {
    let mesh = cube(n);
    group.throughput(Throughput::Elements(mesh.num_elements() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
      b.iter(|| black_box(build_index(mesh, BuildMode::DepthBfs, &config).expect("build")))
    });
  }

  group.finish();
}

/// Nearest-face build over sub-grid subdivision.
fn bench_nearest_subdivision(c: &mut Criterion) {
  let mut group = c.benchmark_group("nearest_subdivision");
  let mesh = cube(4);
  group.throughput(Throughput::Elements(mesh.num_elements() as u64));

  for d in [1u32, 3, 6] {
    let config = ProximityConfig::default().with_subdivision(d);
    group.bench_with_input(BenchmarkId::from_parameter(d), &config, |b, config| {
      b.iter(|| black_box(build_index(&mesh, BuildMode::NearestFaces, config).expect("build")))
    });
  }

  group.finish();
}

/// Same nearest-face build in one chunk vs. many small chunks.
fn bench_chunking(c: &mut Criterion) {
  let mut group = c.benchmark_group("nearest_chunking");
  let mesh = cube(6);
  let base = ProximityConfig::default().with_subdivision(2);
  let per_element = base.points_per_element() * base.n_min;

  for chunk in [16usize, 256, mesh.num_elements()] {
    let config = base.clone().with_scratch_budget(per_element * chunk);
    group.bench_with_input(BenchmarkId::from_parameter(chunk), &config, |b, config| {
      b.iter(|| black_box(build_index(&mesh, BuildMode::NearestFaces, config).expect("build")))
    });
  }

  group.finish();
}

criterion_group!(
  benches,
  bench_bfs_resolution,
  bench_nearest_subdivision,
  bench_chunking
);
criterion_main!(benches);
