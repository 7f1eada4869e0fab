//! Boundary face coordinate export.
//!
//! Produces three flat arrays `x`, `y`, `z` holding the triangle vertices of
//! a face list, 3 entries per face. Workers claim output slots from a single
//! next-free-slot counter, so the face order in the output is arbitrary;
//! `faces[i]` names the face stored at `x/y/z[3i..3i+3]`.

use std::io::Write;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::constants::INVALID_FACE;
use crate::csr::{filled_atomics, into_plain};
use crate::error::{ProximityError, ProximityResult};
use crate::geometry::GeometryOracle;
use crate::index::ProximityIndex;
use crate::selection::{select_candidate_faces, FaceFilter};
use crate::types::FaceId;

/// Which faces to export.
#[derive(Clone, Copy, Debug)]
pub enum FaceSource<'a> {
  /// Every item of a built index, duplicates included.
  IndexItems(&'a ProximityIndex),
  /// Every exposed face of the mesh.
  AllExposed,
}

/// Exported triangle coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceCoords {
  pub faces: Vec<FaceId>,
  pub x: Vec<f64>,
  pub y: Vec<f64>,
  pub z: Vec<f64>,
}

impl FaceCoords {
  pub fn len(&self) -> usize {
    self.faces.len()
  }

  pub fn is_empty(&self) -> bool {
    self.faces.is_empty()
  }

  /// Vertex `corner` (0..3) of output slot `slot`.
  pub fn vertex(&self, slot: usize, corner: usize) -> [f64; 3] {
    let i = 3 * slot + corner;
    [self.x[i], self.y[i], self.z[i]]
  }

  /// Write `face x y z` lines, three per face.
  pub fn write_text<W: Write>(&self, writer: &mut W) -> ProximityResult<()> {
    writeln!(writer, "nfaces {}", self.len())?;
    for (slot, face) in self.faces.iter().enumerate() {
      for corner in 0..3 {
        let [x, y, z] = self.vertex(slot, corner);
        writeln!(writer, "{face} {x} {y} {z}")?;
      }
    }
    Ok(())
  }
}

fn atomic_f64_buffer(len: usize) -> Vec<AtomicU64> {
  (0..len).map(|_| AtomicU64::new(0)).collect()
}

fn into_f64(values: Vec<AtomicU64>) -> Vec<f64> {
  values
    .into_iter()
    .map(|v| f64::from_bits(v.into_inner()))
    .collect()
}

/// Export the triangle coordinates of the faces named by `source`.
pub fn export_face_coords<O: GeometryOracle + ?Sized>(
  oracle: &O,
  source: FaceSource<'_>,
) -> ProximityResult<FaceCoords> {
  let faces: Vec<FaceId> = match source {
    FaceSource::IndexItems(index) => index.csr().items().to_vec(),
    FaceSource::AllExposed => select_candidate_faces(oracle, &FaceFilter::AllExposed),
  };
  if let Some(&bad) = faces.iter().find(|&&f| f as usize >= oracle.num_faces()) {
    return Err(ProximityError::invalid_input(format!(
      "face {bad} does not exist, mesh has {} faces",
      oracle.num_faces()
    )));
  }

  let count = faces.len();
  let next_slot = AtomicUsize::new(0);
  let slot_faces = filled_atomics(count, INVALID_FACE);
  let x = atomic_f64_buffer(3 * count);
  let y = atomic_f64_buffer(3 * count);
  let z = atomic_f64_buffer(3 * count);

  faces.par_iter().try_for_each(|&face| {
    let slot = next_slot.fetch_add(1, Ordering::Relaxed);
    if slot >= count {
      return Err(ProximityError::invariant(format!(
        "export slot {slot} past {count} faces"
      )));
    }
    slot_faces[slot].store(face, Ordering::Relaxed);
    for (corner, v) in oracle.face_vertices(face).iter().enumerate() {
      let i = 3 * slot + corner;
      x[i].store(v.x.to_bits(), Ordering::Relaxed);
      y[i].store(v.y.to_bits(), Ordering::Relaxed);
      z[i].store(v.z.to_bits(), Ordering::Relaxed);
    }
    Ok(())
  })?;

  tracing::debug!(faces = count, "exported face coordinates");

  Ok(FaceCoords {
    faces: into_plain(slot_faces),
    x: into_f64(x),
    y: into_f64(y),
    z: into_f64(z),
  })
}
