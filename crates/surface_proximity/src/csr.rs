//! Compressed sparse row assembly.
//!
//! ```text
//! counts  = [2, 0, 3, 1]
//! offsets = [0, 2, 2, 5, 6]         offsets[e+1] = offsets[e] + counts[e]
//! items   = [a b | | c d e | f]     items[offsets[e]..offsets[e+1]] = faces of e
//! ```
//!
//! Filling is done by many workers at once. Each worker claims a slot inside
//! an element's range with an atomic fetch-add on that element's cursor, so
//! slot ranges are exact while the order inside a range is not.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{ProximityError, ProximityResult};
use crate::types::{ElementId, FaceId};

/// Exclusive prefix sum of `counts`.
///
/// Returns `(offsets, total)` with `offsets.len() == counts.len() + 1`.
/// `expected_len` guards against passing a counts array for the wrong mesh.
pub fn build_csr(counts: &[u32], expected_len: usize) -> ProximityResult<(Vec<usize>, usize)> {
  if counts.len() != expected_len {
    return Err(ProximityError::invalid_input(format!(
      "counts has {} entries, expected {expected_len}",
      counts.len()
    )));
  }

  let mut offsets = Vec::with_capacity(counts.len() + 1);
  let mut total = 0usize;
  offsets.push(0);
  for &count in counts {
    total = total
      .checked_add(count as usize)
      .ok_or_else(|| ProximityError::invalid_input("CSR total overflows usize"))?;
    offsets.push(total);
  }

  Ok((offsets, total))
}

/// Zero-initialized atomic counters.
pub(crate) fn zeroed_atomics(len: usize) -> Vec<AtomicU32> {
  (0..len).map(|_| AtomicU32::new(0)).collect()
}

/// Atomic slots pre-filled with `value`.
pub(crate) fn filled_atomics(len: usize, value: u32) -> Vec<AtomicU32> {
  (0..len).map(|_| AtomicU32::new(value)).collect()
}

/// Unwrap atomics once all workers are done.
pub(crate) fn into_plain(values: Vec<AtomicU32>) -> Vec<u32> {
  values.into_iter().map(AtomicU32::into_inner).collect()
}

/// Per-element write cursors for the fill phase.
pub struct SlotCursors {
  cursors: Vec<AtomicU32>,
}

impl SlotCursors {
  /// Cursors for `num_elements` elements, all at zero.
  pub fn new(num_elements: usize) -> Self {
    Self {
      cursors: zeroed_atomics(num_elements),
    }
  }

  /// Claim the next free slot of `element` and return its absolute index.
  ///
  /// Fails if the element's allotted range `offsets[e]..offsets[e+1]` is
  /// already full, which means count and fill phases disagree.
  #[inline]
  pub fn claim(&self, element: ElementId, offsets: &[usize]) -> ProximityResult<usize> {
    let e = element as usize;
    let begin = offsets[e];
    let allotted = offsets[e + 1] - begin;
    let cursor = self.cursors[e].fetch_add(1, Ordering::Relaxed) as usize;

    if cursor >= allotted {
      return Err(ProximityError::invariant(format!(
        "element {element} claimed slot {cursor} of {allotted}"
      )));
    }

    Ok(begin + cursor)
  }

  /// Cursor value of one element.
  pub fn position(&self, element: ElementId) -> u32 {
    self.cursors[element as usize].load(Ordering::Relaxed)
  }

  /// Check that every element in `elements` filled exactly its range.
  pub fn verify_filled(
    &self,
    offsets: &[usize],
    elements: std::ops::Range<usize>,
  ) -> ProximityResult<()> {
    for e in elements {
      let filled = self.cursors[e].load(Ordering::Relaxed) as usize;
      let allotted = offsets[e + 1] - offsets[e];
      if filled != allotted {
        return Err(ProximityError::invariant(format!(
          "element {e} filled {filled} slots, counted {allotted}"
        )));
      }
    }
    Ok(())
  }
}

/// Fill-phase target: offsets, cursors and the shared items buffer.
pub struct CsrSink<'a> {
  offsets: &'a [usize],
  cursors: &'a SlotCursors,
  items: &'a [AtomicU32],
}

impl<'a> CsrSink<'a> {
  pub fn new(offsets: &'a [usize], cursors: &'a SlotCursors, items: &'a [AtomicU32]) -> Self {
    Self {
      offsets,
      cursors,
      items,
    }
  }

  /// Record `face` for `element` in the next free slot of its range.
  #[inline]
  pub fn push(&self, element: ElementId, face: FaceId) -> ProximityResult<()> {
    let slot = self.cursors.claim(element, self.offsets)?;
    self.items[slot].swap(face, Ordering::Relaxed);
    Ok(())
  }
}

/// Final per-element face lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProximityCsr {
  offsets: Vec<usize>,
  items: Vec<FaceId>,
}

impl ProximityCsr {
  /// Wrap existing arrays after checking the CSR invariants.
  pub fn from_parts(offsets: Vec<usize>, items: Vec<FaceId>) -> ProximityResult<Self> {
    let csr = Self { offsets, items };
    csr.validate()?;
    Ok(csr)
  }

  /// CSR with `num_elements` empty groups.
  pub fn empty(num_elements: usize) -> Self {
    Self {
      offsets: vec![0; num_elements + 1],
      items: Vec::new(),
    }
  }

  /// Check `offsets[0] == 0`, monotonicity and `offsets[last] == items.len()`.
  pub fn validate(&self) -> ProximityResult<()> {
    let Some(&first) = self.offsets.first() else {
      return Err(ProximityError::invariant("offsets array is empty"));
    };
    if first != 0 {
      return Err(ProximityError::invariant(format!("offsets[0] is {first}, expected 0")));
    }
    if let Some(e) = self.offsets.windows(2).position(|w| w[0] > w[1]) {
      return Err(ProximityError::invariant(format!(
        "offsets decrease at element {e}: {} > {}",
        self.offsets[e],
        self.offsets[e + 1]
      )));
    }
    let last = self.offsets[self.offsets.len() - 1];
    if last != self.items.len() {
      return Err(ProximityError::invariant(format!(
        "offsets end at {last} but there are {} items",
        self.items.len()
      )));
    }
    Ok(())
  }

  /// Number of elements covered.
  pub fn num_elements(&self) -> usize {
    self.offsets.len().saturating_sub(1)
  }

  /// Total number of (element, face) records.
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn offsets(&self) -> &[usize] {
    &self.offsets
  }

  pub fn items(&self) -> &[FaceId] {
    &self.items
  }

  /// Faces recorded for `element`; empty for out-of-range ids.
  #[inline]
  pub fn faces_near(&self, element: ElementId) -> &[FaceId] {
    let e = element as usize;
    if e >= self.num_elements() {
      return &[];
    }
    &self.items[self.offsets[e]..self.offsets[e + 1]]
  }

  /// Number of records for `element`.
  #[inline]
  pub fn count_of(&self, element: ElementId) -> usize {
    self.faces_near(element).len()
  }

  /// Distinct faces of `element`, ascending. Use for order-free comparisons.
  pub fn face_set(&self, element: ElementId) -> Vec<FaceId> {
    let mut faces = self.faces_near(element).to_vec();
    faces.sort_unstable();
    faces.dedup();
    faces
  }

  /// Iterate `(element, faces)` groups in element order.
  pub fn iter(&self) -> impl Iterator<Item = (ElementId, &[FaceId])> + '_ {
    self
      .offsets
      .windows(2)
      .enumerate()
      .map(|(e, w)| (e as ElementId, &self.items[w[0]..w[1]]))
  }

  pub fn into_parts(self) -> (Vec<usize>, Vec<FaceId>) {
    (self.offsets, self.items)
  }
}

#[cfg(test)]
#[path = "csr_test.rs"]
mod csr_test;
