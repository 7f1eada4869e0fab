//! Mesh access and geometric predicates.
//!
//! The proximity builder never owns mesh connectivity. It reads it through
//! [`GeometryOracle`], which any mesh representation can implement.
//! [`TetMesh`] is the in-memory reference implementation used by the CLI,
//! tests and benchmarks.
//!
//! ```text
//!            element e                      element n
//!        ┌───────────────┐  interior    ┌───────────────┐
//!        │               │    face      │               │
//!  wall ─┤ exposed face  ├──────────────┤               │
//!        │               │ adjacent_    │               │
//!        └───────────────┘ element_     └───────────────┘
//!                          across(e, i)
//! ```

pub mod generation;
pub mod oracle;
pub mod primitives;
pub mod tet_mesh;

pub use oracle::GeometryOracle;
pub use primitives::{
  closest_point_on_triangle, is_within_depth, min_vertex_distance, point_triangle_distance,
  sub_grid_points,
};
pub use tet_mesh::TetMesh;
