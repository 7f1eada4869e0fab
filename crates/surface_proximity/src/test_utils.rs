//! Shared test fixtures and brute-force references.

use std::collections::{BTreeSet, HashSet, VecDeque};

use glam::DVec3;

use crate::csr::ProximityCsr;
use crate::geometry::{min_vertex_distance, point_triangle_distance, sub_grid_points};
use crate::geometry::{GeometryOracle, TetMesh};
use crate::types::{ElementId, ElementList, FaceId, FaceList};

/// Exposed face at `x = 0`, owned by element 0 of a [`ChainOracle`].
pub const CHAIN_FACE_A: FaceId = 100;
/// Exposed face at `x = spacing`, owned by element 1 of a [`ChainOracle`].
pub const CHAIN_FACE_B: FaceId = 101;
pub const CHAIN_CLASS_A: i32 = 7;
pub const CHAIN_CLASS_B: i32 = 8;

/// A linear chain of small tetrahedra `0 - 1 - ... - (len-1)` along +X.
///
/// Element `e` has its right-angle corner at `x = e * spacing` and edge
/// length `spacing / 2`, so its distance to the plane `x = 0` grows by
/// `spacing` per hop. Interior face `i` links elements `i` and `i + 1`.
/// Only [`CHAIN_FACE_A`] and [`CHAIN_FACE_B`] are exposed.
pub struct ChainOracle {
  len: usize,
  spacing: f64,
}

impl ChainOracle {
  pub fn new(len: usize, spacing: f64) -> Self {
    assert!((2..=100).contains(&len), "chain length must be in 2..=100");
    Self { len, spacing }
  }

  fn wall(&self, x: f64) -> [DVec3; 3] {
    [DVec3::new(x, 0.0, 0.0), DVec3::new(x, 1.0, 0.0), DVec3::new(x, 0.0, 1.0)]
  }
}

impl GeometryOracle for ChainOracle {
  fn num_elements(&self) -> usize {
    self.len
  }

  fn num_faces(&self) -> usize {
    CHAIN_FACE_B as usize + 1
  }

  fn element_vertices(&self, element: ElementId) -> [DVec3; 4] {
    let x = element as f64 * self.spacing;
    let h = self.spacing * 0.5;
    [
      DVec3::new(x, 0.0, 0.0),
      DVec3::new(x + h, 0.0, 0.0),
      DVec3::new(x, h, 0.0),
      DVec3::new(x, 0.0, h),
    ]
  }

  fn face_vertices(&self, face: FaceId) -> [DVec3; 3] {
    match face {
      CHAIN_FACE_A => self.wall(0.0),
      CHAIN_FACE_B => self.wall(self.spacing),
      link => self.wall((link as f64 + 1.0) * self.spacing),
    }
  }

  fn is_exposed(&self, face: FaceId) -> bool {
    face == CHAIN_FACE_A || face == CHAIN_FACE_B
  }

  fn exposed_faces_of(&self, element: ElementId) -> FaceList {
    match element {
      0 => FaceList::from_slice(&[CHAIN_FACE_A]),
      1 => FaceList::from_slice(&[CHAIN_FACE_B]),
      _ => FaceList::new(),
    }
  }

  fn interior_faces_of(&self, element: ElementId) -> FaceList {
    let mut faces = FaceList::new();
    if element > 0 {
      faces.push(element - 1);
    }
    if (element as usize) + 1 < self.len {
      faces.push(element);
    }
    faces
  }

  fn adjacent_element_across(
    &self,
    element: ElementId,
    interior_face_index: usize,
  ) -> Option<ElementId> {
    let link = *self.interior_faces_of(element).get(interior_face_index)?;
    Some(if link == element { element + 1 } else { element - 1 })
  }

  fn classification_id_of(&self, face: FaceId) -> i32 {
    match face {
      CHAIN_FACE_A => CHAIN_CLASS_A,
      CHAIN_FACE_B => CHAIN_CLASS_B,
      _ => 0,
    }
  }

  fn owner_of(&self, face: FaceId) -> Option<ElementId> {
    match face {
      CHAIN_FACE_A => Some(0),
      CHAIN_FACE_B => Some(1),
      _ => None,
    }
  }
}

/// Unit right-angle tetrahedron.
pub fn single_tet() -> TetMesh {
  let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
  TetMesh::new(vertices, vec![[0, 1, 2, 3]]).unwrap()
}

/// Flat tetrahedron whose face `(0, 1, 2)` is a zero-area sliver.
///
/// Returns the mesh and the id of the sliver face.
pub fn sliver_tet() -> (TetMesh, FaceId) {
  let vertices = vec![DVec3::ZERO, DVec3::X, 2.0 * DVec3::X, DVec3::Z];
  let mesh = TetMesh::new(vertices, vec![[0, 1, 2, 3]]).unwrap();
  let sliver = mesh.face_id_of([0, 1, 2]).unwrap();
  (mesh, sliver)
}

/// Sorted, deduplicated faces per element.
pub fn csr_sets(csr: &ProximityCsr) -> Vec<Vec<FaceId>> {
  (0..csr.num_elements())
    .map(|e| csr.face_set(e as ElementId))
    .collect()
}

/// Sequential unbounded BFS with a hash set for visited elements.
///
/// Returns the sorted face list (with multiplicity) of every element.
pub fn reference_bfs<O: GeometryOracle + ?Sized>(
  oracle: &O,
  depth: f64,
  excluded: &[i32],
) -> Vec<Vec<FaceId>> {
  let mut result = vec![Vec::new(); oracle.num_elements()];

  for seed in 0..oracle.num_elements() as ElementId {
    let faces = oracle.exposed_faces_of(seed);
    if faces.is_empty()
      || faces
        .iter()
        .any(|&f| excluded.contains(&oracle.classification_id_of(f)))
    {
      continue;
    }

    let mut visited = HashSet::from([seed]);
    let mut pending = VecDeque::from([seed]);
    while let Some(element) = pending.pop_front() {
      let tet = oracle.element_vertices(element);
      let mut hit = false;
      for &face in &faces {
        if min_vertex_distance(&tet, oracle.face_vertices(face)) <= depth {
          result[element as usize].push(face);
          hit = true;
        }
      }
      if hit {
        let neighbors: ElementList = oracle.neighbors_of(element);
        for n in neighbors {
          if visited.insert(n) {
            pending.push_back(n);
          }
        }
      }
    }
  }

  for faces in &mut result {
    faces.sort_unstable();
  }
  result
}

/// Distance tolerance for nearest-face property checks.
pub const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Check the nearest-face properties for one element's recorded faces.
///
/// - every recorded face ranks within the `n_min` closest candidates at some
///   sample point;
/// - at every sample point, each candidate strictly closer than the `n_min`-th
///   smallest distance is recorded.
pub fn check_nearest_element<O: GeometryOracle + ?Sized>(
  oracle: &O,
  element: ElementId,
  candidates: &[FaceId],
  subdivision: u32,
  n_min: usize,
  recorded: &[FaceId],
) -> Result<(), String> {
  let recorded: BTreeSet<FaceId> = recorded.iter().copied().collect();
  let tet = oracle.element_vertices(element);
  let mut points = Vec::new();
  sub_grid_points(&tet, subdivision, &mut points);

  let per_point: Vec<Vec<(f64, FaceId)>> = points
    .iter()
    .map(|&p| {
      let mut dists: Vec<(f64, FaceId)> = candidates
        .iter()
        .map(|&f| (point_triangle_distance(p, oracle.face_vertices(f)), f))
        .filter(|(d, _)| d.is_finite())
        .collect();
      dists.sort_by(|a, b| a.0.total_cmp(&b.0));
      dists
    })
    .collect();

  for &face in &recorded {
    let ranked = per_point.iter().any(|dists| {
      let Some(&(d, _)) = dists.iter().find(|(_, f)| *f == face) else {
        return false;
      };
      let closer = dists
        .iter()
        .filter(|(other, _)| *other < d - DISTANCE_TOLERANCE)
        .count();
      closer < n_min
    });
    if !ranked {
      return Err(format!("element {element}: face {face} is never among the {n_min} closest"));
    }
  }

  for dists in &per_point {
    let Some(&(threshold, _)) = dists.get(n_min - 1).or(dists.last()) else {
      continue;
    };
    for &(d, face) in dists {
      if dists.len() > n_min && d < threshold - DISTANCE_TOLERANCE && !recorded.contains(&face) {
        return Err(format!("element {element}: face {face} at {d} is missing"));
      }
      if dists.len() <= n_min && !recorded.contains(&face) {
        return Err(format!("element {element}: face {face} is missing"));
      }
    }
  }

  Ok(())
}
