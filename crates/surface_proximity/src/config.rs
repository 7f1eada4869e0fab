//! ProximityConfig - tuning for both build modes and the chunk budget.

use crate::constants::{
  lattice_point_count, DEFAULT_DEPTH, DEFAULT_N_MIN, DEFAULT_QUEUE_CAPACITY,
  DEFAULT_SCRATCH_BUDGET, DEFAULT_SUBDIVISION,
};
use crate::error::{ProximityError, ProximityResult};
use crate::selection::FaceFilter;

/// Configuration for building a proximity index.
#[derive(Clone, Debug, PartialEq)]
pub struct ProximityConfig {
  /// BFS depth threshold in mesh units.
  pub depth: f64,

  /// Classification ids whose faces disqualify a BFS seed.
  pub excluded_classes: Vec<i32>,

  /// Per-seed BFS queue capacity.
  pub queue_capacity: usize,

  /// Nearest faces kept per sample point.
  pub n_min: usize,

  /// Sub-grid subdivision `d`; `G = (d+1)(d+2)(d+3)/6` points per element.
  pub subdivision: u32,

  /// Scratch slots allowed per chunk.
  /// chunk_size = scratch_budget / scratch_per_element
  pub scratch_budget: usize,

  /// Candidate faces for nearest-face sampling.
  pub face_filter: FaceFilter,
}

impl Default for ProximityConfig {
  fn default() -> Self {
    Self {
      depth: DEFAULT_DEPTH,
      excluded_classes: Vec::new(),
      queue_capacity: DEFAULT_QUEUE_CAPACITY,
      n_min: DEFAULT_N_MIN,
      subdivision: DEFAULT_SUBDIVISION,
      scratch_budget: DEFAULT_SCRATCH_BUDGET,
      face_filter: FaceFilter::AllExposed,
    }
  }
}

impl ProximityConfig {
  pub fn with_depth(mut self, depth: f64) -> Self {
    self.depth = depth;
    self
  }

  pub fn with_excluded_classes(mut self, classes: Vec<i32>) -> Self {
    self.excluded_classes = classes;
    self
  }

  pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
    self.queue_capacity = capacity;
    self
  }

  pub fn with_n_min(mut self, n_min: usize) -> Self {
    self.n_min = n_min;
    self
  }

  pub fn with_subdivision(mut self, subdivision: u32) -> Self {
    self.subdivision = subdivision;
    self
  }

  pub fn with_scratch_budget(mut self, budget: usize) -> Self {
    self.scratch_budget = budget;
    self
  }

  pub fn with_face_filter(mut self, filter: FaceFilter) -> Self {
    self.face_filter = filter;
    self
  }

  /// Sample points per element for the configured subdivision.
  #[inline]
  pub fn points_per_element(&self) -> usize {
    lattice_point_count(self.subdivision)
  }

  /// Reject settings that would make a build meaningless or impossible.
  pub fn validate(&self) -> ProximityResult<()> {
    if !self.depth.is_finite() || self.depth < 0.0 {
      return Err(ProximityError::configuration(format!(
        "depth must be finite and non-negative, got {}",
        self.depth
      )));
    }
    if self.n_min == 0 {
      return Err(ProximityError::configuration("n_min must be positive"));
    }
    if self.queue_capacity == 0 {
      return Err(ProximityError::configuration("queue_capacity must be positive"));
    }
    if self.scratch_budget == 0 {
      return Err(ProximityError::configuration("scratch_budget must be positive"));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
