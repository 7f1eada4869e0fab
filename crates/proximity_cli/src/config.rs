//! Configuration parsing for proximity index builds.

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use surface_proximity::constants::{
	DEFAULT_DEPTH, DEFAULT_N_MIN, DEFAULT_QUEUE_CAPACITY, DEFAULT_SCRATCH_BUDGET,
	DEFAULT_SUBDIVISION,
};
use surface_proximity::geometry::generation::box_mesh;
use surface_proximity::io::load_mesh;
use surface_proximity::{BuildMode, FaceFilter, ProximityConfig, TetMesh};

/// Root configuration for a proximity build.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Build mode: "bfs" or "nearest".
	pub mode: ModeName,
	/// Output index path, relative to the config file.
	#[serde(default = "default_output")]
	pub output: PathBuf,
	/// Mesh to index.
	pub mesh: MeshConfig,
	/// Collector tuning.
	#[serde(default)]
	pub proximity: ProximitySection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
	Bfs,
	Nearest,
}

impl From<ModeName> for BuildMode {
	fn from(mode: ModeName) -> Self {
		match mode {
			ModeName::Bfs => BuildMode::DepthBfs,
			ModeName::Nearest => BuildMode::NearestFaces,
		}
	}
}

/// Mesh source: a mesh text file or a generated box.
#[derive(Debug, Deserialize)]
pub struct MeshConfig {
	/// Path to a mesh text file, relative to the config file.
	pub path: Option<PathBuf>,
	/// Cells per axis of a generated box mesh.
	pub box_cells: Option<[usize; 3]>,
	/// Extent of a generated box mesh (default: unit cube).
	#[serde(default = "default_box_extent")]
	pub box_extent: [f64; 3],
}

/// Which exposed faces the nearest-face collector samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterName {
	#[default]
	All,
	Exclude,
	Only,
}

/// `[proximity]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProximitySection {
	pub depth: f64,
	pub excluded_classes: Vec<i32>,
	pub queue_capacity: usize,
	pub n_min: usize,
	pub subdivision: u32,
	pub scratch_budget: usize,
	pub face_filter: FilterName,
	/// Classification ids used by the `exclude` and `only` filters.
	pub filter_classes: Vec<i32>,
}

impl Default for ProximitySection {
	fn default() -> Self {
		Self {
			depth: DEFAULT_DEPTH,
			excluded_classes: Vec::new(),
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
			n_min: DEFAULT_N_MIN,
			subdivision: DEFAULT_SUBDIVISION,
			scratch_budget: DEFAULT_SCRATCH_BUDGET,
			face_filter: FilterName::All,
			filter_classes: Vec::new(),
		}
	}
}

fn default_output() -> PathBuf {
	PathBuf::from("proximity.spx")
}

fn default_box_extent() -> [f64; 3] {
	[1.0, 1.0, 1.0]
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		match (&config.mesh.path, &config.mesh.box_cells) {
			(Some(_), Some(_)) => anyhow::bail!("[mesh] takes either `path` or `box_cells`, not both"),
			(None, None) => anyhow::bail!("[mesh] needs `path` or `box_cells`"),
			_ => {}
		}
		config
			.proximity_config()
			.validate()
			.context("Invalid [proximity] settings")?;

		Ok(config)
	}

	pub fn build_mode(&self) -> BuildMode {
		self.mode.into()
	}

	/// Library configuration for this build.
	pub fn proximity_config(&self) -> ProximityConfig {
		let p = &self.proximity;
		let filter = match p.face_filter {
			FilterName::All => FaceFilter::AllExposed,
			FilterName::Exclude => FaceFilter::ExcludeClasses(p.filter_classes.clone()),
			FilterName::Only => FaceFilter::OnlyClasses(p.filter_classes.clone()),
		};

		ProximityConfig::default()
			.with_depth(p.depth)
			.with_excluded_classes(p.excluded_classes.clone())
			.with_queue_capacity(p.queue_capacity)
			.with_n_min(p.n_min)
			.with_subdivision(p.subdivision)
			.with_scratch_budget(p.scratch_budget)
			.with_face_filter(filter)
	}
}

impl MeshConfig {
	/// Load or generate the mesh. Relative paths resolve against `base_dir`.
	pub fn load(&self, base_dir: &Path) -> Result<TetMesh> {
		if let Some(path) = &self.path {
			let path = base_dir.join(path);
			return load_mesh(&path)
				.with_context(|| format!("Failed to load mesh: {}", path.display()));
		}

		let cells = self
			.box_cells
			.context("[mesh] needs `path` or `box_cells`")?;
		box_mesh(cells, DVec3::from_array(self.box_extent)).context("Failed to generate box mesh")
	}
}
