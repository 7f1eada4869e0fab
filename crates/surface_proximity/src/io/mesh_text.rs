//! Plain-text tetrahedral mesh format.
//!
//! ```text
//! # comment
//! vertices 4
//! 0 0 0
//! 1 0 0
//! 0 1 0
//! 0 0 1
//! tets 1
//! 0 1 2 3
//! classes 1          (optional)
//! 0 1 2 5            v0 v1 v2 class, exposed faces only
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use glam::DVec3;

use super::MAX_PREALLOC;
use crate::error::{ProximityError, ProximityResult};
use crate::geometry::tet_mesh::DEFAULT_CLASSIFICATION;
use crate::geometry::{GeometryOracle, TetMesh};
use crate::types::FaceId;

/// Content lines with their 1-based line numbers.
struct ContentLines<R> {
  inner: std::io::Lines<R>,
  line_no: usize,
}

impl<R: BufRead> ContentLines<R> {
  fn new(reader: R) -> Self {
    Self {
      inner: reader.lines(),
      line_no: 0,
    }
  }

  fn next_content(&mut self) -> ProximityResult<Option<(usize, String)>> {
    for line in self.inner.by_ref() {
      self.line_no += 1;
      let line = line?;
      let trimmed = line.trim();
      if trimmed.is_empty() || trimmed.starts_with('#') {
        continue;
      }
      return Ok(Some((self.line_no, trimmed.to_string())));
    }
    Ok(None)
  }

  fn expect(&mut self, what: &str) -> ProximityResult<(usize, String)> {
    self
      .next_content()?
      .ok_or_else(|| ProximityError::format(format!("unexpected end of file, expected {what}")))
  }
}

fn parse_fields<T, const N: usize>(line: &str, line_no: usize, what: &str) -> ProximityResult<[T; N]>
where
  T: FromStr + Copy + Default,
{
  let mut out = [T::default(); N];
  let mut tokens = line.split_whitespace();
  for slot in out.iter_mut() {
    let token = tokens
      .next()
      .ok_or_else(|| ProximityError::format(format!("line {line_no}: {what} needs {N} values")))?;
    *slot = token
      .parse()
      .map_err(|_| ProximityError::format(format!("line {line_no}: bad {what} value {token:?}")))?;
  }
  if tokens.next().is_some() {
    return Err(ProximityError::format(format!(
      "line {line_no}: {what} has more than {N} values"
    )));
  }
  Ok(out)
}

/// Parse a `<keyword> <count>` section header.
fn parse_header(line: &str, line_no: usize, keyword: &str) -> ProximityResult<usize> {
  let mut tokens = line.split_whitespace();
  let count = match (tokens.next(), tokens.next(), tokens.next()) {
    (Some(word), Some(count), None) if word == keyword => count.parse().ok(),
    _ => None,
  };
  count.ok_or_else(|| {
    ProximityError::format(format!(
      "line {line_no}: expected `{keyword} <count>`, got {line:?}"
    ))
  })
}

/// Parse a mesh from text.
pub fn read_mesh_text<R: BufRead>(reader: R) -> ProximityResult<TetMesh> {
  let mut lines = ContentLines::new(reader);

  let (line_no, header) = lines.expect("`vertices <count>`")?;
  let num_vertices = parse_header(&header, line_no, "vertices")?;
  let mut vertices = Vec::with_capacity(num_vertices.min(MAX_PREALLOC));
  for _ in 0..num_vertices {
    let (line_no, line) = lines.expect("vertex")?;
    let [x, y, z] = parse_fields::<f64, 3>(&line, line_no, "vertex")?;
    vertices.push(DVec3::new(x, y, z));
  }

  let (line_no, header) = lines.expect("`tets <count>`")?;
  let num_tets = parse_header(&header, line_no, "tets")?;
  let mut tets = Vec::with_capacity(num_tets.min(MAX_PREALLOC));
  for _ in 0..num_tets {
    let (line_no, line) = lines.expect("tet")?;
    tets.push(parse_fields::<u32, 4>(&line, line_no, "tet")?);
  }

  let mut mesh = TetMesh::new(vertices, tets)?;

  if let Some((line_no, header)) = lines.next_content()? {
    let num_classes = parse_header(&header, line_no, "classes")?;
    for _ in 0..num_classes {
      let (line_no, line) = lines.expect("class")?;
      let [v0, v1, v2, class] = parse_fields::<i64, 4>(&line, line_no, "class")?;
      let ids = [v0, v1, v2].map(|v| u32::try_from(v).unwrap_or(u32::MAX));
      let face = mesh
        .face_id_of(ids)
        .filter(|&f| mesh.is_exposed(f))
        .ok_or_else(|| {
          ProximityError::format(format!(
            "line {line_no}: {v0} {v1} {v2} is not an exposed face"
          ))
        })?;
      let class = i32::try_from(class)
        .map_err(|_| ProximityError::format(format!("line {line_no}: class {class} out of range")))?;
      mesh.set_classification(face, class)?;
    }
  }

  if let Some((line_no, line)) = lines.next_content()? {
    return Err(ProximityError::format(format!(
      "line {line_no}: unexpected content {line:?}"
    )));
  }

  Ok(mesh)
}

/// Write `mesh` in the text format. Only non-default classes are listed.
pub fn write_mesh_text<W: Write>(writer: &mut W, mesh: &TetMesh) -> ProximityResult<()> {
  writeln!(writer, "vertices {}", mesh.num_vertices())?;
  for v in mesh.vertices() {
    writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
  }

  writeln!(writer, "tets {}", mesh.num_elements())?;
  for [a, b, c, d] in mesh.tets() {
    writeln!(writer, "{a} {b} {c} {d}")?;
  }

  let classified: Vec<FaceId> = (0..mesh.num_faces() as FaceId)
    .filter(|&f| mesh.is_exposed(f) && mesh.classification_id_of(f) != DEFAULT_CLASSIFICATION)
    .collect();
  if !classified.is_empty() {
    writeln!(writer, "classes {}", classified.len())?;
    for face in classified {
      let [a, b, c] = mesh.face_vertex_ids(face);
      writeln!(writer, "{a} {b} {c} {}", mesh.classification_id_of(face))?;
    }
  }
  Ok(())
}

/// Read a mesh text file.
pub fn load_mesh(path: impl AsRef<Path>) -> ProximityResult<TetMesh> {
  let path = path.as_ref();
  let mesh = read_mesh_text(BufReader::new(File::open(path)?))?;
  tracing::info!(
    path = %path.display(),
    elements = mesh.num_elements(),
    exposed = mesh.num_exposed_faces(),
    "loaded mesh"
  );
  Ok(mesh)
}

/// Write a mesh text file.
pub fn save_mesh(path: impl AsRef<Path>, mesh: &TetMesh) -> ProximityResult<()> {
  let mut writer = BufWriter::new(File::create(path)?);
  write_mesh_text(&mut writer, mesh)?;
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
#[path = "mesh_text_test.rs"]
mod mesh_text_test;
