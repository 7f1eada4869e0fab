use std::io::Cursor;

use glam::DVec3;

use super::*;
use crate::config::ProximityConfig;
use crate::driver::build_index;
use crate::geometry::generation::box_mesh;

fn sample_index() -> ProximityIndex {
  let csr = ProximityCsr::from_parts(vec![0, 2, 2, 5], vec![4, 9, 1, 1, 7]).unwrap();
  ProximityIndex::new(csr, BuildMode::NearestFaces, 3)
}

fn encode(index: &ProximityIndex) -> Vec<u8> {
  let mut bytes = Vec::new();
  write_index(&mut bytes, index).unwrap();
  bytes
}

// =========================================================================
// Batch 1: Round trip
// =========================================================================

#[test]
fn test_layout_size() {
  let bytes = encode(&sample_index());
  // header 24 + 4 offsets * 8 + 5 items * 4
  assert_eq!(bytes.len(), 24 + 32 + 20);
  assert_eq!(&bytes[..4], CSR_MAGIC);
}

#[test]
fn test_round_trip_preserves_arrays() {
  let index = sample_index();
  let loaded = read_index(&mut Cursor::new(encode(&index))).unwrap();

  assert_eq!(loaded.csr().offsets(), index.csr().offsets());
  assert_eq!(loaded.csr().items(), index.csr().items());
  assert_eq!(loaded.mode(), BuildMode::NearestFaces);
  assert_eq!(loaded.subdivision(), 3);
  assert!(loaded.stats().is_none());
}

#[test]
fn test_file_round_trip_of_built_index() {
  let mesh = box_mesh([3, 2, 2], DVec3::ONE).unwrap();
  let config = ProximityConfig::default().with_depth(0.3);
  let index = build_index(&mesh, BuildMode::DepthBfs, &config).unwrap();

  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bfs.spx");
  save_index(&path, &index).unwrap();
  let loaded = load_index(&path).unwrap();

  assert_eq!(loaded, index);
  assert_eq!(loaded.subdivision(), 0);
}

#[test]
fn test_empty_index_round_trip() {
  let index = ProximityIndex::new(ProximityCsr::empty(0), BuildMode::DepthBfs, 0);
  let loaded = read_index(&mut Cursor::new(encode(&index))).unwrap();
  assert_eq!(loaded.csr().offsets(), &[0]);
}

// =========================================================================
// Batch 2: Rejection
// =========================================================================

fn assert_format_error(bytes: Vec<u8>) {
  let err = read_index(&mut Cursor::new(bytes)).unwrap_err();
  assert!(matches!(err, ProximityError::Format(_)), "got {err:?}");
}

#[test]
fn test_bad_magic() {
  let mut bytes = encode(&sample_index());
  bytes[0] = b'X';
  assert_format_error(bytes);
}

#[test]
fn test_bad_version_and_mode() {
  let mut bytes = encode(&sample_index());
  bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
  assert_format_error(bytes);

  let mut bytes = encode(&sample_index());
  bytes[8..12].copy_from_slice(&5u32.to_le_bytes());
  assert_format_error(bytes);
}

#[test]
fn test_truncated_at_every_length() {
  let bytes = encode(&sample_index());
  for len in 0..bytes.len() {
    assert_format_error(bytes[..len].to_vec());
  }
}

#[test]
fn test_trailing_bytes() {
  let mut bytes = encode(&sample_index());
  bytes.push(0);
  assert_format_error(bytes);
}

#[test]
fn test_decreasing_offsets() {
  let mut bytes = encode(&sample_index());
  // offsets[1] = 2 -> 3, so offsets[1] > offsets[2]
  bytes[32..40].copy_from_slice(&3u64.to_le_bytes());
  assert_format_error(bytes);
}

#[test]
fn test_bfs_record_with_subdivision() {
  let index = ProximityIndex::new(ProximityCsr::empty(1), BuildMode::DepthBfs, 0);
  let mut bytes = encode(&index);
  bytes[20..24].copy_from_slice(&2u32.to_le_bytes());
  assert_format_error(bytes);
}

#[test]
fn test_missing_file_is_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let err = load_index(dir.path().join("absent.spx")).unwrap_err();
  assert!(matches!(err, ProximityError::Io(_)));
}
