//! Binary proximity index record.
//!
//! # Layout
//!
//! ```text
//! +-------------------+
//! | Magic (4B)        |  "SPX1"
//! | Version (u32)     |
//! | Mode (u32)        |  0 = BFS, 1 = nearest faces
//! | Elements (u64)    |  N
//! | Subdivision (u32) |  0 for BFS
//! +-------------------+
//! | Offsets (u64)     |  N + 1 entries
//! | Items (u32)       |  offsets[N] entries
//! +-------------------+
//! ```
//!
//! All fields little-endian. Reading checks every field and the CSR
//! invariants; anything inconsistent is a [`ProximityError::Format`].

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::MAX_PREALLOC;
use crate::csr::ProximityCsr;
use crate::error::{ProximityError, ProximityResult};
use crate::index::{BuildMode, ProximityIndex};
use crate::types::FaceId;

/// File magic.
pub const CSR_MAGIC: &[u8; 4] = b"SPX1";

/// Current record version.
pub const CSR_VERSION: u32 = 1;

/// Record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CsrHeader {
  mode: BuildMode,
  num_elements: u64,
  subdivision: u32,
}

impl CsrHeader {
  fn write<W: Write>(&self, writer: &mut W) -> ProximityResult<()> {
    writer.write_all(CSR_MAGIC)?;
    writer.write_all(&CSR_VERSION.to_le_bytes())?;
    writer.write_all(&self.mode.tag().to_le_bytes())?;
    writer.write_all(&self.num_elements.to_le_bytes())?;
    writer.write_all(&self.subdivision.to_le_bytes())?;
    Ok(())
  }

  fn read<R: Read>(reader: &mut R) -> ProximityResult<Self> {
    let magic: [u8; 4] = read_bytes(reader, "magic")?;
    if &magic != CSR_MAGIC {
      return Err(ProximityError::format(format!(
        "bad magic {magic:?}, expected {CSR_MAGIC:?}"
      )));
    }

    let version = u32::from_le_bytes(read_bytes(reader, "version")?);
    if version != CSR_VERSION {
      return Err(ProximityError::format(format!(
        "unsupported version {version}, expected {CSR_VERSION}"
      )));
    }

    let tag = u32::from_le_bytes(read_bytes(reader, "mode")?);
    let mode = BuildMode::from_tag(tag)
      .ok_or_else(|| ProximityError::format(format!("unknown build mode tag {tag}")))?;

    let num_elements = u64::from_le_bytes(read_bytes(reader, "element count")?);
    let subdivision = u32::from_le_bytes(read_bytes(reader, "subdivision")?);
    if mode == BuildMode::DepthBfs && subdivision != 0 {
      return Err(ProximityError::format(format!(
        "BFS record carries subdivision {subdivision}"
      )));
    }

    Ok(Self {
      mode,
      num_elements,
      subdivision,
    })
  }
}

/// Read exactly `N` bytes; running out of input is a format error.
fn read_bytes<const N: usize, R: Read>(reader: &mut R, what: &str) -> ProximityResult<[u8; N]> {
  let mut buf = [0u8; N];
  reader.read_exact(&mut buf).map_err(|err| {
    if err.kind() == ErrorKind::UnexpectedEof {
      ProximityError::format(format!("file truncated while reading {what}"))
    } else {
      err.into()
    }
  })?;
  Ok(buf)
}

fn to_usize(value: u64, what: &str) -> ProximityResult<usize> {
  usize::try_from(value)
    .map_err(|_| ProximityError::format(format!("{what} {value} does not fit in memory")))
}

/// Serialize `index` to `writer`.
pub fn write_index<W: Write>(writer: &mut W, index: &ProximityIndex) -> ProximityResult<()> {
  let csr = index.csr();
  let header = CsrHeader {
    mode: index.mode(),
    num_elements: csr.num_elements() as u64,
    subdivision: index.subdivision(),
  };
  header.write(writer)?;

  for &offset in csr.offsets() {
    writer.write_all(&(offset as u64).to_le_bytes())?;
  }
  for &face in csr.items() {
    writer.write_all(&face.to_le_bytes())?;
  }
  Ok(())
}

/// Deserialize an index written by [`write_index`].
pub fn read_index<R: Read>(reader: &mut R) -> ProximityResult<ProximityIndex> {
  let header = CsrHeader::read(reader)?;
  let num_elements = to_usize(header.num_elements, "element count")?;
  let num_offsets = num_elements
    .checked_add(1)
    .ok_or_else(|| ProximityError::format("element count overflows"))?;

  let mut offsets = Vec::with_capacity(num_offsets.min(MAX_PREALLOC));
  for _ in 0..num_offsets {
    let raw = u64::from_le_bytes(read_bytes(reader, "offsets")?);
    offsets.push(to_usize(raw, "offset")?);
  }

  let num_items = offsets.last().copied().unwrap_or(0);
  let mut items: Vec<FaceId> = Vec::with_capacity(num_items.min(MAX_PREALLOC));
  for _ in 0..num_items {
    items.push(u32::from_le_bytes(read_bytes(reader, "items")?));
  }

  let mut trailing = [0u8; 1];
  if reader.read(&mut trailing)? != 0 {
    return Err(ProximityError::format("trailing bytes after items"));
  }

  let csr = ProximityCsr::from_parts(offsets, items)
    .map_err(|err| ProximityError::format(err.to_string()))?;
  Ok(ProximityIndex::new(csr, header.mode, header.subdivision))
}

/// Write `index` to a file at `path`.
pub fn save_index(path: impl AsRef<Path>, index: &ProximityIndex) -> ProximityResult<()> {
  let path = path.as_ref();
  let mut writer = BufWriter::new(File::create(path)?);
  write_index(&mut writer, index)?;
  writer.flush()?;
  tracing::info!(
    path = %path.display(),
    elements = index.num_elements(),
    records = index.len(),
    "saved proximity index"
  );
  Ok(())
}

/// Read an index from a file at `path`.
pub fn load_index(path: impl AsRef<Path>) -> ProximityResult<ProximityIndex> {
  let path = path.as_ref();
  let mut reader = BufReader::new(File::open(path)?);
  let index = read_index(&mut reader)?;
  tracing::info!(
    path = %path.display(),
    mode = %index.mode(),
    elements = index.num_elements(),
    records = index.len(),
    "loaded proximity index"
  );
  Ok(index)
}

#[cfg(test)]
#[path = "csr_file_test.rs"]
mod csr_file_test;
