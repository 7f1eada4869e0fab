//! Persistence and exports.
//!
//! - [`csr_file`]: binary index record (`SPX1`), exact round trip
//! - [`face_coords`]: x/y/z triangle coordinates of boundary faces
//! - [`text_dump`]: one line per (element, face) record
//! - [`mesh_text`]: plain-text tetrahedral mesh format used by the CLI

pub mod csr_file;
pub mod face_coords;
pub mod mesh_text;
pub mod text_dump;

pub use csr_file::{load_index, read_index, save_index, write_index, CSR_MAGIC, CSR_VERSION};
pub use face_coords::{export_face_coords, FaceCoords, FaceSource};
pub use mesh_text::{load_mesh, read_mesh_text, save_mesh, write_mesh_text};
pub use text_dump::write_text_dump;

/// Upper bound on speculative allocation while reading untrusted lengths.
pub(crate) const MAX_PREALLOC: usize = 1 << 20;
