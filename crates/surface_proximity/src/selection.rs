//! Candidate face selection for the nearest-face collector.
//!
//! A parallel mark pass flags the faces that pass the filter, then an ordered
//! compaction turns the marks into a face id list sorted ascending.

use rayon::prelude::*;

use crate::geometry::GeometryOracle;
use crate::types::FaceId;

/// Which exposed faces take part in nearest-face sampling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FaceFilter {
  /// Every exposed face.
  #[default]
  AllExposed,
  /// Exposed faces whose classification is not listed (e.g. skip detectors).
  ExcludeClasses(Vec<i32>),
  /// Only exposed faces whose classification is listed (e.g. material sheath).
  OnlyClasses(Vec<i32>),
}

impl FaceFilter {
  /// True if an exposed face with classification `class` passes.
  #[inline]
  pub fn accepts_class(&self, class: i32) -> bool {
    match self {
      FaceFilter::AllExposed => true,
      FaceFilter::ExcludeClasses(ids) => !ids.contains(&class),
      FaceFilter::OnlyClasses(ids) => ids.contains(&class),
    }
  }

  /// True if `face` is exposed and passes the filter.
  #[inline]
  pub fn accepts<O: GeometryOracle + ?Sized>(&self, oracle: &O, face: FaceId) -> bool {
    oracle.is_exposed(face) && self.accepts_class(oracle.classification_id_of(face))
  }
}

/// Face ids passing `filter`, ascending.
pub fn select_candidate_faces<O: GeometryOracle + ?Sized>(
  oracle: &O,
  filter: &FaceFilter,
) -> Vec<FaceId> {
  let marks: Vec<bool> = (0..oracle.num_faces())
    .into_par_iter()
    .map(|face| filter.accepts(oracle, face as FaceId))
    .collect();

  marks
    .iter()
    .enumerate()
    .filter_map(|(face, &marked)| marked.then_some(face as FaceId))
    .collect()
}
