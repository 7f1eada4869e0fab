//! Read-only mesh access consumed by the collectors.

use glam::DVec3;

use crate::types::{ElementId, ElementList, FaceId, FaceList};

/// Read-only view of a tetrahedral mesh.
///
/// Implementations must be safe to query from many rayon workers at once;
/// the collectors never mutate the mesh.
pub trait GeometryOracle: Sync {
  /// Number of elements; valid ids are `0..num_elements()`.
  fn num_elements(&self) -> usize;

  /// Number of faces; valid ids are `0..num_faces()`.
  fn num_faces(&self) -> usize;

  /// The four vertex positions of an element.
  fn element_vertices(&self, element: ElementId) -> [DVec3; 4];

  /// The three vertex positions of a face.
  fn face_vertices(&self, face: FaceId) -> [DVec3; 3];

  /// True if the face lies on the domain boundary (owned by one element).
  fn is_exposed(&self, face: FaceId) -> bool;

  /// Exposed faces of an element (0 to 4).
  fn exposed_faces_of(&self, element: ElementId) -> FaceList;

  /// Interior faces of an element (0 to 4).
  fn interior_faces_of(&self, element: ElementId) -> FaceList;

  /// Element on the other side of the `interior_face_index`-th entry of
  /// [`interior_faces_of`](Self::interior_faces_of).
  ///
  /// Returns `None` when the index is out of range.
  fn adjacent_element_across(
    &self,
    element: ElementId,
    interior_face_index: usize,
  ) -> Option<ElementId>;

  /// Geometric-model classification of a face.
  fn classification_id_of(&self, face: FaceId) -> i32;

  /// Element owning an exposed face, `None` for interior faces.
  fn owner_of(&self, face: FaceId) -> Option<ElementId>;

  /// All elements sharing an interior face with `element`.
  fn neighbors_of(&self, element: ElementId) -> ElementList {
    let count = self.interior_faces_of(element).len();
    (0..count)
      .filter_map(|i| self.adjacent_element_across(element, i))
      .collect()
  }
}
