//! Structured tetrahedral mesh generation.
//!
//! ```text
//! Each hexahedral cell is split into 6 tetrahedra around the 0→7 diagonal
//! (Kuhn subdivision), one per axis permutation (a, b, c):
//!
//!       6──────7         tet = [ v0,
//!      /│     /│                 v0 + e_a,
//!     4─┼────5 │                 v0 + e_a + e_b,
//!     │ 2────┼─3                 v7 ]
//!     │/     │/
//!     0──────1          Neighboring cells agree on shared face diagonals,
//!                       so the mesh is conforming.
//! ```

use glam::DVec3;

use super::TetMesh;
use crate::error::{ProximityError, ProximityResult};

/// Classification of exposed faces on the -X side of a box mesh.
pub const SIDE_NEG_X: i32 = 1;
/// Classification of exposed faces on the +X side of a box mesh.
pub const SIDE_POS_X: i32 = 2;
/// Classification of exposed faces on the -Y side of a box mesh.
pub const SIDE_NEG_Y: i32 = 3;
/// Classification of exposed faces on the +Y side of a box mesh.
pub const SIDE_POS_Y: i32 = 4;
/// Classification of exposed faces on the -Z side of a box mesh.
pub const SIDE_NEG_Z: i32 = 5;
/// Classification of exposed faces on the +Z side of a box mesh.
pub const SIDE_POS_Z: i32 = 6;

const AXIS_PERMUTATIONS: [[usize; 3]; 6] = [
  [0, 1, 2],
  [0, 2, 1],
  [1, 0, 2],
  [1, 2, 0],
  [2, 0, 1],
  [2, 1, 0],
];

/// Box `[0, extent]` split into `cells` hexahedra, 6 tetrahedra each.
///
/// Exposed faces are classified by box side (`SIDE_*` constants).
pub fn box_mesh(cells: [usize; 3], extent: DVec3) -> ProximityResult<TetMesh> {
  if cells.iter().any(|&n| n == 0) {
    return Err(ProximityError::invalid_input(format!(
      "box mesh needs at least one cell per axis, got {cells:?}"
    )));
  }
  if !(extent.cmpgt(DVec3::ZERO).all() && extent.is_finite()) {
    return Err(ProximityError::invalid_input(format!(
      "box extent must be positive and finite, got {extent}"
    )));
  }

  let [nx, ny, nz] = cells;
  let spacing = extent / DVec3::new(nx as f64, ny as f64, nz as f64);
  let vertex_index = |i: usize, j: usize, k: usize| (i + (nx + 1) * (j + (ny + 1) * k)) as u32;

  let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
  for k in 0..=nz {
    for j in 0..=ny {
      for i in 0..=nx {
        vertices.push(DVec3::new(i as f64, j as f64, k as f64) * spacing);
      }
    }
  }

  let mut tets = Vec::with_capacity(nx * ny * nz * 6);
  for k in 0..nz {
    for j in 0..ny {
      for i in 0..nx {
        let base = [i, j, k];
        for perm in AXIS_PERMUTATIONS {
          let mut corner = base;
          let v0 = vertex_index(corner[0], corner[1], corner[2]);
          corner[perm[0]] += 1;
          let v1 = vertex_index(corner[0], corner[1], corner[2]);
          corner[perm[1]] += 1;
          let v2 = vertex_index(corner[0], corner[1], corner[2]);
          let v3 = vertex_index(i + 1, j + 1, k + 1);
          tets.push([v0, v1, v2, v3]);
        }
      }
    }
  }

  let mut mesh = TetMesh::new(vertices, tets)?;
  let tolerance = extent.min_element() * 1e-9;
  mesh.classify_exposed_with(|verts| box_side_of(verts, extent, tolerance));
  Ok(mesh)
}

/// Side of the box `[0, extent]` a boundary triangle lies on.
fn box_side_of(verts: &[DVec3; 3], extent: DVec3, tolerance: f64) -> i32 {
  let centroid = (verts[0] + verts[1] + verts[2]) / 3.0;
  const SIDES: [(i32, i32); 3] = [
    (SIDE_NEG_X, SIDE_POS_X),
    (SIDE_NEG_Y, SIDE_POS_Y),
    (SIDE_NEG_Z, SIDE_POS_Z),
  ];

  for (axis, (neg, pos)) in SIDES.iter().enumerate() {
    if centroid[axis].abs() <= tolerance {
      return *neg;
    }
    if (centroid[axis] - extent[axis]).abs() <= tolerance {
      return *pos;
    }
  }

  super::tet_mesh::DEFAULT_CLASSIFICATION
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod generation_test;
