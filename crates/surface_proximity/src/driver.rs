//! Chunked build driver.
//!
//! ```text
//! merge-forward (chunk-local writes, nearest faces):
//!
//!   chunk k:  count(k) ──► counts[0..N] ──► build_csr ──► offsets
//!                                                          │
//!   items(k-1) ─── copy [0, offsets[start_k]) ───► items(k) ◄┘ (new buffer)
//!                                                  │
//!                               fill(k) ──────────►┘ [offsets[start_k], total)
//!
//! two-sweep (writes escape the chunk, BFS):
//!
//!   count(0) count(1) ... count(K-1) ──► build_csr ──► fill(0) ... fill(K-1)
//! ```
//!
//! Chunks run strictly one after another; parallelism lives inside each
//! collector phase. After every fill the touched cursors must match their
//! counts exactly.

use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use web_time::Instant;

use crate::collect::{BfsCollector, ChunkCollector, ChunkTally, NearestFaceCollector};
use crate::config::ProximityConfig;
use crate::constants::INVALID_FACE;
use crate::csr::{
  build_csr, filled_atomics, into_plain, zeroed_atomics, CsrSink, ProximityCsr, SlotCursors,
};
use crate::error::{ProximityError, ProximityResult};
use crate::geometry::GeometryOracle;
use crate::index::{BuildMode, ProximityIndex};
use crate::stats::BuildStats;

/// Partition of `0..num_tasks` into equal sequential chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
  num_tasks: usize,
  chunk_size: usize,
}

impl ChunkPlan {
  /// `chunk_size = scratch_budget / scratch_per_element`, capped at `num_tasks`.
  ///
  /// A budget that cannot hold one element's scratch is a configuration error.
  pub fn new(
    num_tasks: usize,
    scratch_per_element: usize,
    scratch_budget: usize,
  ) -> ProximityResult<Self> {
    if scratch_per_element == 0 {
      return Err(ProximityError::configuration(
        "per-element scratch must be positive",
      ));
    }
    let chunk_size = scratch_budget / scratch_per_element;
    if chunk_size == 0 {
      return Err(ProximityError::configuration(format!(
        "scratch budget {scratch_budget} cannot hold one element ({scratch_per_element} slots)"
      )));
    }

    Ok(Self {
      num_tasks,
      chunk_size: chunk_size.min(num_tasks).max(1),
    })
  }

  pub fn chunk_size(&self) -> usize {
    self.chunk_size
  }

  pub fn num_chunks(&self) -> usize {
    self.num_tasks.div_ceil(self.chunk_size)
  }

  /// Task ranges in ascending order.
  pub fn chunks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
    (0..self.num_chunks()).map(move |k| {
      let start = k * self.chunk_size;
      start..(start + self.chunk_size).min(self.num_tasks)
    })
  }
}

/// Build a proximity index over every element of `oracle`.
#[tracing::instrument(skip_all, name = "proximity::build_index", fields(mode = %mode))]
pub fn build_index<O: GeometryOracle + ?Sized>(
  oracle: &O,
  mode: BuildMode,
  config: &ProximityConfig,
) -> ProximityResult<ProximityIndex> {
  config.validate()?;
  let start = Instant::now();
  let num_elements = oracle.num_elements();

  tracing::info!(
    elements = num_elements,
    faces = oracle.num_faces(),
    "building proximity index"
  );

  let (csr, tally, plan) = match mode {
    BuildMode::DepthBfs => {
      let collector = BfsCollector::from_config(config);
      run_collector(oracle, &collector, config.scratch_budget)?
    }
    BuildMode::NearestFaces => {
      let collector = NearestFaceCollector::from_config(oracle, config);
      tracing::debug!(
        candidates = collector.candidates().len(),
        points = collector.points_per_element(),
        "selected candidate faces"
      );
      run_collector(oracle, &collector, config.scratch_budget)?
    }
  };

  let stats = BuildStats {
    mode,
    elements: num_elements,
    seeds: tally.seeds,
    overflowed: tally.overflowed,
    chunks: plan.num_chunks(),
    chunk_size: plan.chunk_size(),
    total_records: csr.len(),
    elapsed_us: start.elapsed().as_micros() as u64,
  };

  if stats.has_overflow() {
    tracing::warn!(
      overflowed = stats.overflowed,
      capacity = config.queue_capacity,
      "some BFS traversals were truncated; raise queue_capacity"
    );
  }
  tracing::info!(%stats, "proximity index built");

  Ok(ProximityIndex::new(csr, mode, config.subdivision).with_stats(stats))
}

/// Drive `collector` over all elements in budget-sized chunks.
pub fn run_collector<O, C>(
  oracle: &O,
  collector: &C,
  scratch_budget: usize,
) -> ProximityResult<(ProximityCsr, ChunkTally, ChunkPlan)>
where
  O: GeometryOracle + ?Sized,
  C: ChunkCollector,
{
  let plan = ChunkPlan::new(
    oracle.num_elements(),
    collector.scratch_per_element(),
    scratch_budget,
  )?;

  tracing::debug!(
    collector = collector.name(),
    chunks = plan.num_chunks(),
    chunk_size = plan.chunk_size(),
    "planned chunks"
  );

  let (csr, tally) = if collector.writes_outside_chunk() {
    collect_two_sweep(oracle, collector, &plan)?
  } else {
    collect_merge_forward(oracle, collector, &plan)?
  };

  Ok((csr, tally, plan))
}

/// Count every chunk, build the offsets once, then fill every chunk.
fn collect_two_sweep<O, C>(
  oracle: &O,
  collector: &C,
  plan: &ChunkPlan,
) -> ProximityResult<(ProximityCsr, ChunkTally)>
where
  O: GeometryOracle + ?Sized,
  C: ChunkCollector,
{
  let num_elements = oracle.num_elements();
  let counts = zeroed_atomics(num_elements);
  let mut tally = ChunkTally::default();
  let mut scratches = Vec::with_capacity(plan.num_chunks());

  {
    let _span = tracing::info_span!("count_sweep").entered();
    for (k, chunk) in plan.chunks().enumerate() {
      let counted = collector.count_chunk(oracle, chunk.clone(), &counts)?;
      tracing::info!(
        chunk = k,
        tasks = chunk.len(),
        seeds = counted.tally.seeds,
        "counted chunk"
      );
      tally.merge(counted.tally);
      scratches.push(counted.scratch);
    }
  }

  let (offsets, total) = build_csr(&into_plain(counts), num_elements)?;
  tracing::debug!(total, "built offsets");

  let cursors = SlotCursors::new(num_elements);
  let items = filled_atomics(total, INVALID_FACE);
  {
    let _span = tracing::info_span!("fill_sweep").entered();
    let sink = CsrSink::new(&offsets, &cursors, &items);
    for (k, (chunk, scratch)) in plan.chunks().zip(scratches).enumerate() {
      collector.fill_chunk(oracle, chunk.clone(), scratch, &sink)?;
      tracing::info!(chunk = k, tasks = chunk.len(), "filled chunk");
    }
  }
  cursors.verify_filled(&offsets, 0..num_elements)?;

  let csr = ProximityCsr::from_parts(offsets, into_plain(items))?;
  Ok((csr, tally))
}

/// Per chunk: count, rebuild offsets, grow the items buffer, fill.
fn collect_merge_forward<O, C>(
  oracle: &O,
  collector: &C,
  plan: &ChunkPlan,
) -> ProximityResult<(ProximityCsr, ChunkTally)>
where
  O: GeometryOracle + ?Sized,
  C: ChunkCollector,
{
  let num_elements = oracle.num_elements();
  let counts = zeroed_atomics(num_elements);
  let cursors = SlotCursors::new(num_elements);
  let mut offsets = vec![0usize; num_elements + 1];
  let mut items: Vec<AtomicU32> = Vec::new();
  let mut tally = ChunkTally::default();

  for (k, chunk) in plan.chunks().enumerate() {
    let _span = tracing::info_span!("chunk", index = k).entered();

    let counted = collector.count_chunk(oracle, chunk.clone(), &counts)?;
    tally.merge(counted.tally);

    let snapshot: Vec<u32> = counts.iter().map(|c| c.load(Ordering::Relaxed)).collect();
    let (next_offsets, total) = build_csr(&snapshot, num_elements)?;

    // Everything before this chunk must be exactly what was already filled.
    let finalized = next_offsets[chunk.start];
    if finalized != items.len() || next_offsets[..=chunk.start] != offsets[..=chunk.start] {
      return Err(ProximityError::invariant(format!(
        "chunk {k} moved finalized offsets ({finalized} vs {} items)",
        items.len()
      )));
    }

    let mut grown = Vec::with_capacity(total);
    grown.extend(std::mem::take(&mut items));
    grown.resize_with(total, || AtomicU32::new(INVALID_FACE));
    items = grown;
    offsets = next_offsets;
    tracing::debug!(finalized, total, "grew items buffer");

    let sink = CsrSink::new(&offsets, &cursors, &items);
    collector.fill_chunk(oracle, chunk.clone(), counted.scratch, &sink)?;
    cursors.verify_filled(&offsets, chunk.clone())?;

    tracing::info!(
      chunk = k,
      tasks = chunk.len(),
      records = total - finalized,
      "processed chunk"
    );
  }

  let csr = ProximityCsr::from_parts(offsets, into_plain(items))?;
  Ok((csr, tally))
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;
