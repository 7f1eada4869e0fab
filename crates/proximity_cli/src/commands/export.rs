//! `export` subcommand.

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use surface_proximity::io::{export_face_coords, load_index, write_text_dump, FaceSource};

use super::config_dir;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExportArgs {
	/// Configuration TOML naming the mesh.
	#[arg(short, long)]
	pub config: PathBuf,

	/// Saved index; without it every exposed face is exported.
	#[arg(short, long)]
	pub index: Option<PathBuf>,

	/// Face coordinate output file.
	#[arg(short, long)]
	pub output: PathBuf,

	/// Also write a text dump of the index records.
	#[arg(long)]
	pub dump: Option<PathBuf>,
}

pub fn execute(args: ExportArgs) -> Result<()> {
	let config = Config::load(&args.config)?;
	let mesh = config.mesh.load(config_dir(&args.config))?;

	let index = args
		.index
		.as_ref()
		.map(|path| {
			load_index(path).with_context(|| format!("Failed to read index: {}", path.display()))
		})
		.transpose()?;
	if let Some(index) = &index {
		if index.num_elements() != mesh.tets().len() {
			anyhow::bail!(
				"Index covers {} elements but the mesh has {}",
				index.num_elements(),
				mesh.tets().len()
			);
		}
	}

	let source = match &index {
		Some(index) => FaceSource::IndexItems(index),
		None => FaceSource::AllExposed,
	};
	let coords = export_face_coords(&mesh, source).context("Face export failed")?;

	let mut writer = BufWriter::new(
		File::create(&args.output)
			.with_context(|| format!("Failed to create: {}", args.output.display()))?,
	);
	coords.write_text(&mut writer)?;
	writer.flush()?;
	println!(
		"Wrote {} faces to: {}",
		coords.len(),
		args.output.display()
	);

	if let Some(dump) = args.dump {
		let Some(index) = &index else {
			anyhow::bail!("--dump needs --index");
		};
		let mut writer = BufWriter::new(
			File::create(&dump)
				.with_context(|| format!("Failed to create dump: {}", dump.display()))?,
		);
		write_text_dump(&mut writer, &mesh, index.csr())?;
		writer.flush()?;
		println!("Text dump written to: {}", dump.display());
	}

	Ok(())
}
