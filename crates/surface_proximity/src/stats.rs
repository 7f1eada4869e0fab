//! Statistics reported by a build.

use std::fmt;

use crate::index::BuildMode;

/// Counters and timing from one index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
  /// Build mode that produced the index.
  pub mode: BuildMode,
  /// Number of mesh elements.
  pub elements: usize,
  /// BFS seeds traversed, or elements sampled in nearest-face mode.
  pub seeds: usize,
  /// BFS traversals truncated by the queue capacity.
  pub overflowed: usize,
  /// Chunks processed.
  pub chunks: usize,
  /// Tasks per chunk.
  pub chunk_size: usize,
  /// Total (element, face) records.
  pub total_records: usize,
  /// Wall time in microseconds.
  pub elapsed_us: u64,
}

impl BuildStats {
  pub fn new(mode: BuildMode) -> Self {
    Self {
      mode,
      elements: 0,
      seeds: 0,
      overflowed: 0,
      chunks: 0,
      chunk_size: 0,
      total_records: 0,
      elapsed_us: 0,
    }
  }

  /// Mean records per element.
  pub fn records_per_element(&self) -> f64 {
    if self.elements == 0 {
      return 0.0;
    }
    self.total_records as f64 / self.elements as f64
  }

  /// True if any BFS traversal was truncated.
  pub fn has_overflow(&self) -> bool {
    self.overflowed > 0
  }
}

impl fmt::Display for BuildStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} build: {} elements, {} seeds, {} records ({:.2}/element), {} chunks of {}, {} overflowed, {:.2}ms",
      self.mode,
      self.elements,
      self.seeds,
      self.total_records,
      self.records_per_element(),
      self.chunks,
      self.chunk_size,
      self.overflowed,
      self.elapsed_us as f64 / 1000.0
    )
  }
}
