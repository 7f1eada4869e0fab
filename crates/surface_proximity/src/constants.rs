//! Build constants and default tuning values.
//!
//! # Scratch Layout
//!
//! ```text
//! Nearest-face scratch for one element (G sample points, nMin slots each):
//!
//! point 0          point 1                point G-1
//! ┌───┬───┬───┐    ┌───┬───┬───┐          ┌───┬───┬───┐
//! │ 0 │ 1 │ … │    │ 0 │ 1 │ … │   ...    │ 0 │ 1 │ … │
//! └───┴───┴───┘    └───┴───┴───┘          └───┴───┴───┘
//!  (dist, face)     nMin slots                 nMin slots
//!
//! slots per element = G * nMin,  G = (d+1)(d+2)(d+3)/6
//! ```
//!
//! A chunk holds `scratch_budget / slots_per_element` elements.

use crate::types::FaceId;

/// Sentinel for an unused nearest-face slot.
pub const INVALID_FACE: FaceId = FaceId::MAX;

/// Initial distance of an unused nearest-face slot.
pub const FAR_DISTANCE: f64 = f64::MAX;

/// Default proximity depth in mesh units (meters).
pub const DEFAULT_DEPTH: f64 = 0.05;

/// Default per-seed BFS queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100_000;

/// Default number of nearest faces kept per sample point.
pub const DEFAULT_N_MIN: usize = 4;

/// Default sub-grid subdivision (84 sample points per element).
pub const DEFAULT_SUBDIVISION: u32 = 6;

/// Default scratch budget in slots (300M slots).
pub const DEFAULT_SCRATCH_BUDGET: usize = 300_000_000;

/// Vertices of a tetrahedral element.
pub const TET_VERTICES: usize = 4;

/// Faces of a tetrahedral element.
pub const TET_FACES: usize = 4;

/// Local vertex triples of the four tetrahedron faces.
///
/// Face `i` is opposite vertex `i`.
pub const TET_FACE_VERTICES: [[usize; 3]; TET_FACES] = [
  [1, 2, 3], // opposite 0
  [0, 2, 3], // opposite 1
  [0, 1, 3], // opposite 2
  [0, 1, 2], // opposite 3
];

/// Number of sub-grid points for subdivision `d`: `(d+1)(d+2)(d+3)/6`.
#[inline]
pub const fn lattice_point_count(subdivision: u32) -> usize {
  let d = subdivision as usize;
  (d + 1) * (d + 2) * (d + 3) / 6
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
