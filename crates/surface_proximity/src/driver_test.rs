use glam::DVec3;

use super::*;
use crate::constants::lattice_point_count;
use crate::geometry::generation::{box_mesh, SIDE_NEG_Y};
use crate::geometry::TetMesh;
use crate::test_utils::*;
use crate::types::ElementId;

fn bfs_config(depth: f64) -> ProximityConfig {
  ProximityConfig::default()
    .with_depth(depth)
    .with_queue_capacity(1_000)
}

fn nearest_config(subdivision: u32, n_min: usize) -> ProximityConfig {
  ProximityConfig::default()
    .with_subdivision(subdivision)
    .with_n_min(n_min)
}

// =========================================================================
// Batch 1: Chunk plan
// =========================================================================

#[test]
fn test_plan_covers_range_in_order() {
  let plan = ChunkPlan::new(10, 4, 12).unwrap();
  assert_eq!(plan.chunk_size(), 3);
  assert_eq!(plan.num_chunks(), 4);

  let chunks: Vec<_> = plan.chunks().collect();
  assert_eq!(chunks, vec![0..3, 3..6, 6..9, 9..10]);
}

#[test]
fn test_plan_caps_chunk_at_task_count() {
  let plan = ChunkPlan::new(5, 1, 1_000).unwrap();
  assert_eq!(plan.chunk_size(), 5);
  assert_eq!(plan.num_chunks(), 1);
}

#[test]
fn test_plan_empty_range_has_no_chunks() {
  let plan = ChunkPlan::new(0, 8, 64).unwrap();
  assert_eq!(plan.num_chunks(), 0);
  assert_eq!(plan.chunks().count(), 0);
}

#[test]
fn test_plan_budget_below_one_element_is_configuration_error() {
  let err = ChunkPlan::new(10, 336, 335).unwrap_err();
  assert!(matches!(err, ProximityError::Configuration(_)));

  let err = ChunkPlan::new(10, 0, 100).unwrap_err();
  assert!(matches!(err, ProximityError::Configuration(_)));
}

// =========================================================================
// Batch 2: BFS builds
// =========================================================================

#[test]
fn test_chain_scenario() {
  let chain = ChainOracle::new(10, 0.02);
  let index = build_index(&chain, BuildMode::DepthBfs, &bfs_config(0.05)).unwrap();

  let csr = index.csr();
  assert_eq!(csr.offsets().len(), 11);
  csr.validate().unwrap();

  let sets = csr_sets(csr);
  assert_eq!(sets[0], vec![CHAIN_FACE_A, CHAIN_FACE_B]);
  assert_eq!(sets[1], vec![CHAIN_FACE_A, CHAIN_FACE_B]);
  assert_eq!(sets[2], vec![CHAIN_FACE_A, CHAIN_FACE_B]);
  assert_eq!(sets[3], vec![CHAIN_FACE_B]);
  assert!(sets[4..].iter().all(|s| s.is_empty()));

  let stats = index.stats().unwrap();
  assert_eq!(stats.seeds, 2);
  assert_eq!(stats.total_records, 7);
  assert_eq!(index.subdivision(), 0);
}

#[test]
fn test_bfs_chunk_invariance() {
  let mesh = box_mesh([4, 3, 3], DVec3::new(1.0, 0.75, 0.75)).unwrap();
  let base = bfs_config(0.3);
  let single = build_index(&mesh, BuildMode::DepthBfs, &base).unwrap();
  assert_eq!(single.stats().unwrap().chunks, 1);

  for chunk_size in [1, 7, 50] {
    let config = base.clone().with_scratch_budget(base.queue_capacity * chunk_size);
    let chunked = build_index(&mesh, BuildMode::DepthBfs, &config).unwrap();

    assert!(chunked.stats().unwrap().chunks > 1);
    assert_eq!(chunked.csr().offsets(), single.csr().offsets());
    assert_eq!(csr_sets(chunked.csr()), csr_sets(single.csr()));
  }
}

#[test]
fn test_bfs_matches_reference_with_exclusion() {
  let mesh = box_mesh([3, 3, 3], DVec3::ONE).unwrap();
  let config = bfs_config(0.4).with_excluded_classes(vec![SIDE_NEG_Y]);
  let index = build_index(&mesh, BuildMode::DepthBfs, &config).unwrap();

  let expected = reference_bfs(&mesh, 0.4, &[SIDE_NEG_Y]);
  for (e, faces) in expected.iter().enumerate() {
    let mut got = index.faces_near(e as ElementId).to_vec();
    got.sort_unstable();
    assert_eq!(&got, faces, "element {e}");
  }
}

#[test]
fn test_bfs_overflow_is_reported() {
  let chain = ChainOracle::new(10, 0.02);
  let config = ProximityConfig::default()
    .with_depth(1.0)
    .with_queue_capacity(2);
  let index = build_index(&chain, BuildMode::DepthBfs, &config).unwrap();

  let stats = index.stats().unwrap();
  assert_eq!(stats.overflowed, 2);
  assert!(stats.has_overflow());
  index.csr().validate().unwrap();
}

// =========================================================================
// Batch 3: Nearest-face builds
// =========================================================================

#[test]
fn test_nearest_chunk_invariance() {
  let mesh = box_mesh([3, 3, 2], DVec3::new(1.5, 1.5, 1.0)).unwrap();
  let base = nearest_config(2, 3);
  let per_element = lattice_point_count(2) * 3;
  let single = build_index(&mesh, BuildMode::NearestFaces, &base).unwrap();

  for chunk_size in [1, 5, 17] {
    let config = base.clone().with_scratch_budget(per_element * chunk_size);
    let chunked = build_index(&mesh, BuildMode::NearestFaces, &config).unwrap();

    let stats = chunked.stats().unwrap();
    assert_eq!(stats.chunk_size, chunk_size);
    assert_eq!(stats.chunks, mesh.num_elements().div_ceil(chunk_size));
    assert_eq!(chunked.csr().offsets(), single.csr().offsets());
    assert_eq!(csr_sets(chunked.csr()), csr_sets(single.csr()));
  }
}

#[test]
fn test_nearest_properties_hold() {
  let mesh = box_mesh([2, 2, 2], DVec3::ONE).unwrap();
  let config = nearest_config(2, 2).with_scratch_budget(lattice_point_count(2) * 2 * 5);
  let index = build_index(&mesh, BuildMode::NearestFaces, &config).unwrap();
  let candidates = crate::selection::select_candidate_faces(&mesh, &config.face_filter);

  assert_eq!(index.subdivision(), 2);
  for e in 0..mesh.num_elements() as ElementId {
    for &f in index.faces_near(e) {
      assert!(mesh.is_exposed(f));
    }
    check_nearest_element(&mesh, e, &candidates, 2, 2, index.faces_near(e)).unwrap();
  }
}

// =========================================================================
// Batch 4: Determinism and edge cases
// =========================================================================

#[test]
fn test_rebuild_is_idempotent() {
  let mesh = box_mesh([3, 2, 2], DVec3::ONE).unwrap();
  for (mode, config) in [
    (BuildMode::DepthBfs, bfs_config(0.35)),
    (BuildMode::NearestFaces, nearest_config(1, 2)),
  ] {
    let first = build_index(&mesh, mode, &config).unwrap();
    let second = build_index(&mesh, mode, &config).unwrap();

    assert_eq!(first.csr().offsets(), second.csr().offsets());
    assert_eq!(csr_sets(first.csr()), csr_sets(second.csr()));
  }
}

#[test]
fn test_invalid_config_fails_before_work() {
  let chain = ChainOracle::new(3, 0.02);
  let config = ProximityConfig::default().with_n_min(0);
  let err = build_index(&chain, BuildMode::NearestFaces, &config).unwrap_err();
  assert!(matches!(err, ProximityError::Configuration(_)));
}

#[test]
fn test_budget_too_small_for_one_element() {
  let chain = ChainOracle::new(3, 0.02);
  let config = nearest_config(6, 4).with_scratch_budget(100);
  let err = build_index(&chain, BuildMode::NearestFaces, &config).unwrap_err();
  assert!(matches!(err, ProximityError::Configuration(_)));
}

#[test]
fn test_empty_mesh_builds_empty_index() {
  let mesh = TetMesh::new(Vec::new(), Vec::new()).unwrap();
  for mode in [BuildMode::DepthBfs, BuildMode::NearestFaces] {
    let index = build_index(&mesh, mode, &ProximityConfig::default()).unwrap();
    assert_eq!(index.csr().offsets(), &[0]);
    assert!(index.is_empty());
  }
}
