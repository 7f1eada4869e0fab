//! Human-readable dump of an index, one line per record.
//!
//! `fid <face> owner <owning element> elem <element> nf <faces of element>`
//!
//! Interior faces (no owner) print owner `-1`.

use std::io::Write;

use crate::csr::ProximityCsr;
use crate::error::ProximityResult;
use crate::geometry::GeometryOracle;

pub fn write_text_dump<W, O>(writer: &mut W, oracle: &O, csr: &ProximityCsr) -> ProximityResult<()>
where
  W: Write,
  O: GeometryOracle + ?Sized,
{
  for (element, faces) in csr.iter() {
    let nf = faces.len();
    for &face in faces {
      let owner = oracle.owner_of(face).map_or(-1, i64::from);
      writeln!(writer, "fid {face} owner {owner} elem {element} nf {nf}")?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{ChainOracle, CHAIN_FACE_A, CHAIN_FACE_B};

  #[test]
  fn test_dump_lines() {
    let chain = ChainOracle::new(3, 0.02);
    let csr =
      ProximityCsr::from_parts(vec![0, 2, 2, 3], vec![CHAIN_FACE_A, CHAIN_FACE_B, 0]).unwrap();
    let mut out = Vec::new();
    write_text_dump(&mut out, &chain, &csr).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
      lines,
      vec![
        "fid 100 owner 0 elem 0 nf 2",
        "fid 101 owner 1 elem 0 nf 2",
        "fid 0 owner -1 elem 2 nf 1",
      ]
    );
  }

  #[test]
  fn test_empty_index_dumps_nothing() {
    let chain = ChainOracle::new(2, 0.02);
    let mut out = Vec::new();
    write_text_dump(&mut out, &chain, &ProximityCsr::empty(2)).unwrap();
    assert!(out.is_empty());
  }
}
