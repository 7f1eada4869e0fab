//! Per-element collectors driven chunk by chunk.
//!
//! A collector runs in two phases over a range of task ids (seed elements for
//! BFS, elements for nearest faces):
//!
//! 1. **Count**: add the number of records per element into the shared
//!    counters and return whatever scratch the fill phase needs.
//! 2. **Fill**: write the same records into their CSR slots through a
//!    [`CsrSink`].
//!
//! The driver owns the counts, offsets and items buffers; collectors only see
//! the slices they are handed.

mod bfs;
mod nearest;

use std::ops::Range;
use std::sync::atomic::AtomicU32;

pub use bfs::BfsCollector;
pub use nearest::NearestFaceCollector;

use crate::csr::CsrSink;
use crate::error::ProximityResult;
use crate::geometry::GeometryOracle;

/// Counters reported by a counting pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkTally {
  /// Tasks that produced work (BFS seeds, sampled elements).
  pub seeds: usize,
  /// BFS traversals that hit the queue capacity.
  pub overflowed: usize,
}

impl ChunkTally {
  pub fn merge(&mut self, other: ChunkTally) {
    self.seeds += other.seeds;
    self.overflowed += other.overflowed;
  }
}

/// Output of a counting pass.
pub struct Counted<S> {
  pub scratch: S,
  pub tally: ChunkTally,
}

/// A two-phase record producer.
pub trait ChunkCollector: Sync {
  /// Data kept between the count and fill phases of one chunk.
  type Scratch: Send;

  /// Short name used in log events.
  fn name(&self) -> &'static str;

  /// Worst-case scratch slots needed per task, used to size chunks.
  fn scratch_per_element(&self) -> usize;

  /// True if a task may record elements outside its own chunk.
  fn writes_outside_chunk(&self) -> bool;

  /// Add per-element record counts for the tasks in `tasks`.
  fn count_chunk<O: GeometryOracle + ?Sized>(
    &self,
    oracle: &O,
    tasks: Range<usize>,
    counts: &[AtomicU32],
  ) -> ProximityResult<Counted<Self::Scratch>>;

  /// Write the records counted for `tasks`.
  fn fill_chunk<O: GeometryOracle + ?Sized>(
    &self,
    oracle: &O,
    tasks: Range<usize>,
    scratch: Self::Scratch,
    sink: &CsrSink<'_>,
  ) -> ProximityResult<()>;
}
