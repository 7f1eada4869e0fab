//! Depth-limited BFS from boundary seed elements.
//!
//! ```text
//! seed s owns exposed faces F(s)
//!
//! queue: [ s | n1 n2 | n3 n4 n5 | ... ]      head ──►
//!          ▲    ▲
//!          │    └─ neighbors enqueued because s was within depth of F(s)
//!          └─ local index 0
//!
//! dequeue e:
//!   for f in F(s): if min_vertex_distance(e, f) <= depth -> record (e, f)
//!   if anything recorded: enqueue interior neighbors not yet in the queue
//! ```
//!
//! The queue doubles as the visited set (linear scan) and never grows beyond
//! `queue_capacity`. A traversal that would exceed it is truncated, flagged
//! with a `warn` event and counted in the chunk tally.

use std::ops::Range;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use glam::DVec3;
use rayon::prelude::*;
use smallvec::SmallVec;

use super::{ChunkCollector, ChunkTally, Counted};
use crate::config::ProximityConfig;
use crate::csr::CsrSink;
use crate::error::ProximityResult;
use crate::geometry::{is_within_depth, GeometryOracle};
use crate::types::{ElementId, FaceId};

/// Initial queue allocation per worker; grows up to the capacity on demand.
const INITIAL_QUEUE_LEN: usize = 256;

/// Exposed faces of one seed with their triangles.
type SeedFaces = SmallVec<[(FaceId, [DVec3; 3]); 4]>;

/// Records every element within `depth` of a seed's exposed faces.
#[derive(Clone, Debug)]
pub struct BfsCollector {
  depth: f64,
  excluded_classes: Vec<i32>,
  queue_capacity: usize,
}

impl BfsCollector {
  pub fn new(depth: f64, excluded_classes: Vec<i32>, queue_capacity: usize) -> Self {
    Self {
      depth,
      excluded_classes,
      queue_capacity,
    }
  }

  pub fn from_config(config: &ProximityConfig) -> Self {
    Self::new(
      config.depth,
      config.excluded_classes.clone(),
      config.queue_capacity,
    )
  }

  pub fn depth(&self) -> f64 {
    self.depth
  }

  pub fn queue_capacity(&self) -> usize {
    self.queue_capacity
  }

  /// Exposed faces of `element` if it qualifies as a seed.
  ///
  /// An element with no exposed faces is not a seed. An element with any
  /// exposed face in an excluded class is skipped entirely.
  pub fn seed_faces<O: GeometryOracle + ?Sized>(
    &self,
    oracle: &O,
    element: ElementId,
  ) -> Option<SeedFaces> {
    let exposed = oracle.exposed_faces_of(element);
    if exposed.is_empty() {
      return None;
    }
    if exposed
      .iter()
      .any(|&f| self.excluded_classes.contains(&oracle.classification_id_of(f)))
    {
      return None;
    }
    Some(
      exposed
        .iter()
        .map(|&f| (f, oracle.face_vertices(f)))
        .collect(),
    )
  }

  /// Run one seed's traversal, calling `record` for every match.
  ///
  /// Returns `true` if a neighbor was dropped because the queue was full.
  /// `queue` is reused across seeds by the same worker.
  pub fn traverse<O, F>(
    &self,
    oracle: &O,
    seed: ElementId,
    faces: &[(FaceId, [DVec3; 3])],
    queue: &mut Vec<ElementId>,
    mut record: F,
  ) -> ProximityResult<bool>
  where
    O: GeometryOracle + ?Sized,
    F: FnMut(ElementId, FaceId) -> ProximityResult<()>,
  {
    queue.clear();
    queue.push(seed);
    let mut truncated = false;
    let mut head = 0;

    while head < queue.len() {
      let element = queue[head];
      head += 1;

      let tet = oracle.element_vertices(element);
      let mut expand = false;
      for &(face, tri) in faces {
        if is_within_depth(&tet, tri, self.depth) {
          record(element, face)?;
          expand = true;
        }
      }
      if !expand {
        continue;
      }

      for neighbor in oracle.neighbors_of(element) {
        if queue.contains(&neighbor) {
          continue;
        }
        if queue.len() >= self.queue_capacity {
          truncated = true;
          continue;
        }
        queue.push(neighbor);
      }
    }

    Ok(truncated)
  }

  fn new_queue(&self) -> Vec<ElementId> {
    Vec::with_capacity(self.queue_capacity.min(INITIAL_QUEUE_LEN))
  }
}

impl ChunkCollector for BfsCollector {
  /// Fill re-runs the traversal, so nothing is carried over.
  type Scratch = ();

  fn name(&self) -> &'static str {
    "bfs"
  }

  fn scratch_per_element(&self) -> usize {
    self.queue_capacity
  }

  fn writes_outside_chunk(&self) -> bool {
    true
  }

  fn count_chunk<O: GeometryOracle + ?Sized>(
    &self,
    oracle: &O,
    tasks: Range<usize>,
    counts: &[AtomicU32],
  ) -> ProximityResult<Counted<()>> {
    let seeds = AtomicUsize::new(0);
    let overflowed = AtomicUsize::new(0);

    tasks.into_par_iter().try_for_each_init(
      || self.new_queue(),
      |queue, seed| -> ProximityResult<()> {
        let seed = seed as ElementId;
        let Some(faces) = self.seed_faces(oracle, seed) else {
          return Ok(());
        };
        seeds.fetch_add(1, Ordering::Relaxed);

        let truncated = self.traverse(oracle, seed, &faces, queue, |element, _| {
          counts[element as usize].fetch_add(1, Ordering::Relaxed);
          Ok(())
        })?;

        if truncated {
          overflowed.fetch_add(1, Ordering::Relaxed);
          tracing::warn!(
            seed,
            capacity = self.queue_capacity,
            "BFS queue full, traversal truncated"
          );
        }
        Ok(())
      },
    )?;

    Ok(Counted {
      scratch: (),
      tally: ChunkTally {
        seeds: seeds.into_inner(),
        overflowed: overflowed.into_inner(),
      },
    })
  }

  fn fill_chunk<O: GeometryOracle + ?Sized>(
    &self,
    oracle: &O,
    tasks: Range<usize>,
    _scratch: (),
    sink: &CsrSink<'_>,
  ) -> ProximityResult<()> {
    tasks.into_par_iter().try_for_each_init(
      || self.new_queue(),
      |queue, seed| -> ProximityResult<()> {
        let seed = seed as ElementId;
        let Some(faces) = self.seed_faces(oracle, seed) else {
          return Ok(());
        };
        self
          .traverse(oracle, seed, &faces, queue, |element, face| {
            sink.push(element, face)
          })
          .map(|_| ())
      },
    )
  }
}

#[cfg(test)]
#[path = "bfs_test.rs"]
mod bfs_test;
