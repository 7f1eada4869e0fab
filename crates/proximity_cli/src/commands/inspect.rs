//! `inspect` subcommand.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use surface_proximity::io::load_index;
use surface_proximity::{ElementId, ProximityIndex};

#[derive(Args, Debug)]
pub struct InspectArgs {
	/// Saved index file.
	pub index: PathBuf,

	/// Print the faces of one element.
	#[arg(short, long)]
	pub element: Option<ElementId>,
}

/// Per-element record count summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountSummary {
	pub empty: usize,
	pub min: usize,
	pub max: usize,
	pub mean: f64,
}

pub fn summarize(index: &ProximityIndex) -> CountSummary {
	let n = index.num_elements();
	let counts = (0..n as ElementId).map(|e| index.faces_near(e).len());

	let mut summary = CountSummary {
		empty: 0,
		min: usize::MAX,
		max: 0,
		mean: 0.0,
	};
	for count in counts {
		summary.empty += usize::from(count == 0);
		summary.min = summary.min.min(count);
		summary.max = summary.max.max(count);
	}
	if n == 0 {
		summary.min = 0;
	} else {
		summary.mean = index.len() as f64 / n as f64;
	}
	summary
}

pub fn execute(args: InspectArgs) -> Result<()> {
	let index = load_index(&args.index)
		.with_context(|| format!("Failed to read index: {}", args.index.display()))?;
	let summary = summarize(&index);

	println!("Index: {}", args.index.display());
	println!("  mode:        {}", index.mode());
	println!("  subdivision: {}", index.subdivision());
	println!("  elements:    {}", index.num_elements());
	println!("  records:     {}", index.len());
	println!(
		"  per element: min {} / max {} / mean {:.2} ({} empty)",
		summary.min, summary.max, summary.mean, summary.empty
	);

	if let Some(element) = args.element {
		if element as usize >= index.num_elements() {
			anyhow::bail!(
				"Element {} out of range, index has {} elements",
				element,
				index.num_elements()
			);
		}
		let mut faces = index.faces_near(element).to_vec();
		faces.sort_unstable();
		println!("  element {element}: {faces:?}");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use surface_proximity::{BuildMode, ProximityCsr};

	#[test]
	fn test_summary_counts() {
		let csr = ProximityCsr::from_parts(vec![0, 2, 2, 5], vec![1, 2, 3, 4, 5]).unwrap();
		let index = ProximityIndex::new(csr, BuildMode::DepthBfs, 0);
		let summary = summarize(&index);

		assert_eq!(summary.empty, 1);
		assert_eq!(summary.min, 0);
		assert_eq!(summary.max, 3);
		assert!((summary.mean - 5.0 / 3.0).abs() < 1e-12);
	}

	#[test]
	fn test_summary_of_empty_index() {
		let index = ProximityIndex::new(ProximityCsr::empty(0), BuildMode::NearestFaces, 1);
		let summary = summarize(&index);
		assert_eq!(summary.min, 0);
		assert_eq!(summary.mean, 0.0);
	}
}
