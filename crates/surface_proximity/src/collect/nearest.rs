//! Sub-grid nearest-face sampling.
//!
//! Every element is sampled on its barycentric lattice; each sample point
//! keeps the `n_min` closest candidate faces. The per-point lists are merged
//! into one duplicate-free face list per element.
//!
//! Elements are independent, so a chunk's records only land in that chunk's
//! slot ranges. The lists computed while counting are kept as chunk scratch
//! and copied into the CSR during fill.

use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::DVec3;
use rayon::prelude::*;

use super::{ChunkCollector, ChunkTally, Counted};
use crate::config::ProximityConfig;
use crate::constants::{lattice_point_count, FAR_DISTANCE, INVALID_FACE};
use crate::csr::CsrSink;
use crate::error::ProximityResult;
use crate::geometry::{point_triangle_distance, sub_grid_points, GeometryOracle};
use crate::selection::{select_candidate_faces, FaceFilter};
use crate::types::{ElementId, FaceId, FaceList};

/// Per-worker buffers: sample points and `G * n_min` (distance, face) slots.
pub struct NearestScratch {
  points: Vec<DVec3>,
  slots: Vec<(f64, FaceId)>,
}

impl NearestScratch {
  fn new(points_per_element: usize, n_min: usize) -> Self {
    Self {
      points: Vec::with_capacity(points_per_element),
      slots: Vec::with_capacity(points_per_element * n_min),
    }
  }
}

/// Keeps the `n_min` closest candidate faces per sample point.
#[derive(Clone, Debug)]
pub struct NearestFaceCollector {
  subdivision: u32,
  n_min: usize,
  candidates: Vec<FaceId>,
  triangles: Vec<[DVec3; 3]>,
}

impl NearestFaceCollector {
  /// Collector over the faces accepted by `filter`.
  pub fn new<O: GeometryOracle + ?Sized>(
    oracle: &O,
    subdivision: u32,
    n_min: usize,
    filter: &FaceFilter,
  ) -> Self {
    let candidates = select_candidate_faces(oracle, filter);
    Self::with_candidates(oracle, subdivision, n_min, candidates)
  }

  /// Collector over an explicit candidate list.
  pub fn with_candidates<O: GeometryOracle + ?Sized>(
    oracle: &O,
    subdivision: u32,
    n_min: usize,
    candidates: Vec<FaceId>,
  ) -> Self {
    let triangles = candidates.iter().map(|&f| oracle.face_vertices(f)).collect();
    Self {
      subdivision,
      n_min,
      candidates,
      triangles,
    }
  }

  pub fn from_config<O: GeometryOracle + ?Sized>(oracle: &O, config: &ProximityConfig) -> Self {
    Self::new(oracle, config.subdivision, config.n_min, &config.face_filter)
  }

  pub fn candidates(&self) -> &[FaceId] {
    &self.candidates
  }

  pub fn subdivision(&self) -> u32 {
    self.subdivision
  }

  pub fn n_min(&self) -> usize {
    self.n_min
  }

  /// Sample points per element (`G`).
  pub fn points_per_element(&self) -> usize {
    lattice_point_count(self.subdivision)
  }

  pub fn new_scratch(&self) -> NearestScratch {
    NearestScratch::new(self.points_per_element(), self.n_min)
  }

  /// Distinct faces that rank among the `n_min` closest at any sample point.
  pub fn nearest_faces(&self, tet: &[DVec3; 4], scratch: &mut NearestScratch) -> FaceList {
    let n_min = self.n_min;
    if n_min == 0 {
      return FaceList::new();
    }
    let count = sub_grid_points(tet, self.subdivision, &mut scratch.points);

    scratch.slots.clear();
    scratch
      .slots
      .resize(count * n_min, (FAR_DISTANCE, INVALID_FACE));

    for (point, slots) in scratch
      .points
      .iter()
      .zip(scratch.slots.chunks_exact_mut(n_min))
    {
      for (&face, &tri) in self.candidates.iter().zip(&self.triangles) {
        let dist = point_triangle_distance(*point, tri);
        if !dist.is_finite() {
          continue;
        }

        // Replace the largest slot if the new candidate beats it.
        let (worst, worst_dist) = slots
          .iter()
          .enumerate()
          .fold((0, f64::MIN), |acc, (i, &(d, _))| {
            if d > acc.1 {
              (i, d)
            } else {
              acc
            }
          });
        if dist < worst_dist {
          slots[worst] = (dist, face);
        }
      }
    }

    let mut faces = FaceList::new();
    for &(_, face) in &scratch.slots {
      if face != INVALID_FACE && !faces.contains(&face) {
        faces.push(face);
      }
    }
    faces
  }
}

impl ChunkCollector for NearestFaceCollector {
  /// Face lists of the chunk's elements, in element order.
  type Scratch = Vec<FaceList>;

  fn name(&self) -> &'static str {
    "nearest"
  }

  fn scratch_per_element(&self) -> usize {
    self.points_per_element() * self.n_min
  }

  fn writes_outside_chunk(&self) -> bool {
    false
  }

  fn count_chunk<O: GeometryOracle + ?Sized>(
    &self,
    oracle: &O,
    tasks: Range<usize>,
    counts: &[AtomicU32],
  ) -> ProximityResult<Counted<Vec<FaceList>>> {
    let lists: Vec<FaceList> = tasks
      .clone()
      .into_par_iter()
      .map_init(
        || self.new_scratch(),
        |scratch, element| {
          let tet = oracle.element_vertices(element as ElementId);
          self.nearest_faces(&tet, scratch)
        },
      )
      .collect();

    for (element, faces) in tasks.clone().zip(&lists) {
      counts[element].fetch_add(faces.len() as u32, Ordering::Relaxed);
    }

    Ok(Counted {
      scratch: lists,
      tally: ChunkTally {
        seeds: tasks.len(),
        overflowed: 0,
      },
    })
  }

  fn fill_chunk<O: GeometryOracle + ?Sized>(
    &self,
    _oracle: &O,
    tasks: Range<usize>,
    scratch: Vec<FaceList>,
    sink: &CsrSink<'_>,
  ) -> ProximityResult<()> {
    let first = tasks.start;
    scratch
      .into_par_iter()
      .enumerate()
      .try_for_each(|(offset, faces)| {
        let element = (first + offset) as ElementId;
        faces.iter().try_for_each(|&face| sink.push(element, face))
      })
  }
}

#[cfg(test)]
#[path = "nearest_test.rs"]
mod nearest_test;
