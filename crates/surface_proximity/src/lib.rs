//! surface_proximity - per-element boundary face proximity index
//!
//! Builds, for every element of an unstructured tetrahedral mesh, a compact
//! list of nearby boundary (exposed) faces. A particle tracker can then look
//! up the handful of candidate wall faces for the element a particle sits in
//! instead of searching the whole boundary every step.
//!
//! # Build Modes
//!
//! - **Depth BFS**: every element owning exposed faces seeds a bounded
//!   breadth-first traversal over interior-face adjacency and records the
//!   elements lying within `depth` of the seed's faces.
//! - **Nearest faces**: every element samples a barycentric sub-grid and keeps
//!   the `n_min` closest candidate faces per sample point.
//!
//! Both modes emit a single CSR structure through a count-then-fill protocol
//! that is safe under unordered parallel writes (rayon), processed in chunks
//! so that scratch memory stays under a configured budget.
//!
//! # Example
//!
//! ```ignore
//! use surface_proximity::{build_index, BuildMode, ProximityConfig};
//! use surface_proximity::geometry::generation::box_mesh;
//!
//! let mesh = box_mesh([4, 4, 4], glam::DVec3::ONE)?;
//! let config = ProximityConfig::default().with_depth(0.3);
//! let index = build_index(&mesh, BuildMode::DepthBfs, &config)?;
//!
//! for &face in index.faces_near(0) {
//!   println!("face {face} is near element 0");
//! }
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::{lattice_point_count, INVALID_FACE};
pub use error::{ProximityError, ProximityResult};
pub use types::{ElementId, FaceId, FaceList};

// Mesh access and geometric predicates
pub mod geometry;
pub use geometry::{GeometryOracle, TetMesh};

// Build configuration
pub mod config;
pub use config::ProximityConfig;

// Candidate face selection
pub mod selection;
pub use selection::{select_candidate_faces, FaceFilter};

// Compressed sparse row assembly
pub mod csr;
pub use csr::{build_csr, CsrSink, ProximityCsr, SlotCursors};

// Per-element collectors (BFS and sub-grid nearest faces)
pub mod collect;
pub use collect::{BfsCollector, ChunkCollector, ChunkTally, NearestFaceCollector};

// Chunked build driver
pub mod driver;
pub use driver::{build_index, run_collector, ChunkPlan};

pub mod index;
pub use index::{BuildMode, ProximityIndex};

pub mod stats;
pub use stats::BuildStats;

// Persistence and exports
pub mod io;

#[cfg(test)]
pub mod test_utils;
