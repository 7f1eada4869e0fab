//! TetMesh - in-memory tetrahedral mesh implementing [`GeometryOracle`].
//!
//! Faces are discovered from the element list: each tetrahedron contributes
//! its four vertex triples, triples are keyed by their sorted vertex ids, and
//! the number of elements sharing a key decides exposed (1) or interior (2).

use std::collections::HashMap;

use glam::DVec3;

use super::GeometryOracle;
use crate::constants::{TET_FACES, TET_FACE_VERTICES};
use crate::error::{ProximityError, ProximityResult};
use crate::types::{ElementId, ElementList, FaceId, FaceList};

/// Marker for "no element" in the face owner table.
const NO_ELEMENT: ElementId = ElementId::MAX;

/// Classification assigned to exposed faces unless overridden.
pub const DEFAULT_CLASSIFICATION: i32 = 0;

/// Tetrahedral mesh with derived face connectivity.
#[derive(Clone, Debug)]
pub struct TetMesh {
  vertices: Vec<DVec3>,
  tets: Vec<[u32; 4]>,
  /// Sorted vertex ids per face.
  faces: Vec<[u32; 3]>,
  /// Owning elements per face; second slot is `NO_ELEMENT` for exposed faces.
  face_owners: Vec<[ElementId; 2]>,
  /// Face ids per element, in local face order.
  element_faces: Vec<[FaceId; TET_FACES]>,
  classifications: Vec<i32>,
  face_lookup: HashMap<[u32; 3], FaceId>,
}

impl TetMesh {
  /// Build a mesh from vertex positions and tetrahedra (4 vertex ids each).
  pub fn new(vertices: Vec<DVec3>, tets: Vec<[u32; 4]>) -> ProximityResult<Self> {
    let num_vertices = vertices.len();
    let mut faces: Vec<[u32; 3]> = Vec::with_capacity(tets.len() * 2);
    let mut face_owners: Vec<[ElementId; 2]> = Vec::with_capacity(tets.len() * 2);
    let mut element_faces = Vec::with_capacity(tets.len());
    let mut face_lookup: HashMap<[u32; 3], FaceId> = HashMap::with_capacity(tets.len() * 2);

    for (elem, tet) in tets.iter().enumerate() {
      if let Some(&bad) = tet.iter().find(|&&v| v as usize >= num_vertices) {
        return Err(ProximityError::invalid_input(format!(
          "element {elem} references vertex {bad}, mesh has {num_vertices} vertices"
        )));
      }
      for a in 0..4 {
        for b in (a + 1)..4 {
          if tet[a] == tet[b] {
            return Err(ProximityError::invalid_input(format!(
              "element {elem} repeats vertex {}",
              tet[a]
            )));
          }
        }
      }

      let elem = elem as ElementId;
      let mut local = [0 as FaceId; TET_FACES];
      for (slot, verts) in TET_FACE_VERTICES.iter().enumerate() {
        let mut key = [tet[verts[0]], tet[verts[1]], tet[verts[2]]];
        key.sort_unstable();

        let face = match face_lookup.get(&key) {
          Some(&face) => {
            let owners = &mut face_owners[face as usize];
            if owners[1] != NO_ELEMENT {
              return Err(ProximityError::invalid_input(format!(
                "face {key:?} is shared by more than two elements"
              )));
            }
            owners[1] = elem;
            face
          }
          None => {
            let face = faces.len() as FaceId;
            faces.push(key);
            face_owners.push([elem, NO_ELEMENT]);
            face_lookup.insert(key, face);
            face
          }
        };
        local[slot] = face;
      }
      element_faces.push(local);
    }

    let classifications = vec![DEFAULT_CLASSIFICATION; faces.len()];

    Ok(Self {
      vertices,
      tets,
      faces,
      face_owners,
      element_faces,
      classifications,
      face_lookup,
    })
  }

  /// Number of vertices.
  pub fn num_vertices(&self) -> usize {
    self.vertices.len()
  }

  /// Vertex positions.
  pub fn vertices(&self) -> &[DVec3] {
    &self.vertices
  }

  /// Vertex ids of every element.
  pub fn tets(&self) -> &[[u32; 4]] {
    &self.tets
  }

  /// Sorted vertex ids of a face.
  pub fn face_vertex_ids(&self, face: FaceId) -> [u32; 3] {
    self.faces[face as usize]
  }

  /// Look up a face by its vertex ids (any order).
  pub fn face_id_of(&self, mut verts: [u32; 3]) -> Option<FaceId> {
    verts.sort_unstable();
    self.face_lookup.get(&verts).copied()
  }

  /// Number of exposed faces.
  pub fn num_exposed_faces(&self) -> usize {
    self
      .face_owners
      .iter()
      .filter(|owners| owners[1] == NO_ELEMENT)
      .count()
  }

  /// Assign a classification id to one face.
  pub fn set_classification(&mut self, face: FaceId, class: i32) -> ProximityResult<()> {
    let slot = self
      .classifications
      .get_mut(face as usize)
      .ok_or_else(|| ProximityError::invalid_input(format!("face {face} does not exist")))?;
    *slot = class;
    Ok(())
  }

  /// Classify every exposed face from its vertex positions.
  pub fn classify_exposed_with<F>(&mut self, classify: F)
  where
    F: Fn(&[DVec3; 3]) -> i32,
  {
    for face in 0..self.faces.len() {
      if self.face_owners[face][1] == NO_ELEMENT {
        let verts = self.face_vertices(face as FaceId);
        self.classifications[face] = classify(&verts);
      }
    }
  }

  #[inline]
  fn element_face_ids(&self, element: ElementId) -> &[FaceId; TET_FACES] {
    &self.element_faces[element as usize]
  }
}

impl GeometryOracle for TetMesh {
  fn num_elements(&self) -> usize {
    self.tets.len()
  }

  fn num_faces(&self) -> usize {
    self.faces.len()
  }

  fn element_vertices(&self, element: ElementId) -> [DVec3; 4] {
    self.tets[element as usize].map(|v| self.vertices[v as usize])
  }

  fn face_vertices(&self, face: FaceId) -> [DVec3; 3] {
    self.faces[face as usize].map(|v| self.vertices[v as usize])
  }

  fn is_exposed(&self, face: FaceId) -> bool {
    self.face_owners[face as usize][1] == NO_ELEMENT
  }

  fn exposed_faces_of(&self, element: ElementId) -> FaceList {
    self
      .element_face_ids(element)
      .iter()
      .copied()
      .filter(|&f| self.is_exposed(f))
      .collect()
  }

  fn interior_faces_of(&self, element: ElementId) -> FaceList {
    self
      .element_face_ids(element)
      .iter()
      .copied()
      .filter(|&f| !self.is_exposed(f))
      .collect()
  }

  fn adjacent_element_across(
    &self,
    element: ElementId,
    interior_face_index: usize,
  ) -> Option<ElementId> {
    let face = *self.interior_faces_of(element).get(interior_face_index)?;
    let [a, b] = self.face_owners[face as usize];
    Some(if a == element { b } else { a })
  }

  fn classification_id_of(&self, face: FaceId) -> i32 {
    self.classifications[face as usize]
  }

  fn neighbors_of(&self, element: ElementId) -> ElementList {
    self
      .element_face_ids(element)
      .iter()
      .filter_map(|&f| match self.face_owners[f as usize] {
        [_, NO_ELEMENT] => None,
        [a, b] => Some(if a == element { b } else { a }),
      })
      .collect()
  }

  fn owner_of(&self, face: FaceId) -> Option<ElementId> {
    let [owner, other] = self.face_owners[face as usize];
    (other == NO_ELEMENT).then_some(owner)
  }
}

#[cfg(test)]
#[path = "tet_mesh_test.rs"]
mod tet_mesh_test;
