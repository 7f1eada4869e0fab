//! ProximityIndex - the built CSR plus the metadata needed to persist it.

use std::fmt;

use crate::csr::ProximityCsr;
use crate::stats::BuildStats;
use crate::types::{ElementId, FaceId};

/// How the per-element face lists were collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildMode {
  /// Depth-limited BFS from boundary seeds.
  DepthBfs,
  /// Sub-grid nearest-face sampling.
  NearestFaces,
}

impl BuildMode {
  /// Tag stored in persisted files.
  pub fn tag(self) -> u32 {
    match self {
      BuildMode::DepthBfs => 0,
      BuildMode::NearestFaces => 1,
    }
  }

  pub fn from_tag(tag: u32) -> Option<Self> {
    match tag {
      0 => Some(BuildMode::DepthBfs),
      1 => Some(BuildMode::NearestFaces),
      _ => None,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      BuildMode::DepthBfs => "bfs",
      BuildMode::NearestFaces => "nearest",
    }
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Immutable per-element boundary face index.
#[derive(Clone, Debug)]
pub struct ProximityIndex {
  csr: ProximityCsr,
  mode: BuildMode,
  /// Sub-grid subdivision; 0 for BFS builds.
  subdivision: u32,
  /// Present for freshly built indices, absent for loaded ones.
  stats: Option<BuildStats>,
}

impl ProximityIndex {
  pub fn new(csr: ProximityCsr, mode: BuildMode, subdivision: u32) -> Self {
    let subdivision = match mode {
      BuildMode::DepthBfs => 0,
      BuildMode::NearestFaces => subdivision,
    };
    Self {
      csr,
      mode,
      subdivision,
      stats: None,
    }
  }

  pub(crate) fn with_stats(mut self, stats: BuildStats) -> Self {
    self.stats = Some(stats);
    self
  }

  /// Faces recorded for `element`, in unspecified order.
  #[inline]
  pub fn faces_near(&self, element: ElementId) -> &[FaceId] {
    self.csr.faces_near(element)
  }

  pub fn num_elements(&self) -> usize {
    self.csr.num_elements()
  }

  pub fn len(&self) -> usize {
    self.csr.len()
  }

  pub fn is_empty(&self) -> bool {
    self.csr.is_empty()
  }

  pub fn csr(&self) -> &ProximityCsr {
    &self.csr
  }

  pub fn mode(&self) -> BuildMode {
    self.mode
  }

  pub fn subdivision(&self) -> u32 {
    self.subdivision
  }

  pub fn stats(&self) -> Option<&BuildStats> {
    self.stats.as_ref()
  }

  pub fn into_csr(self) -> ProximityCsr {
    self.csr
  }
}

/// Indices compare by content; build statistics are ignored.
impl PartialEq for ProximityIndex {
  fn eq(&self, other: &Self) -> bool {
    self.mode == other.mode && self.subdivision == other.subdivision && self.csr == other.csr
  }
}
