//! `build` subcommand.

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use surface_proximity::build_index;
use surface_proximity::io::{save_index, write_text_dump};

use super::config_dir;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct BuildArgs {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	pub config: PathBuf,

	/// Output index path (default: `output` from the config).
	#[arg(short, long)]
	pub output: Option<PathBuf>,

	/// Also write a text dump of every record.
	#[arg(long)]
	pub dump: Option<PathBuf>,
}

pub fn execute(args: BuildArgs) -> Result<()> {
	let config = Config::load(&args.config)?;
	let base_dir = config_dir(&args.config);
	let mesh = config.mesh.load(base_dir)?;

	let index = build_index(&mesh, config.build_mode(), &config.proximity_config())
		.context("Index build failed")?;
	if let Some(stats) = index.stats() {
		println!("{stats}");
	}

	let output = args
		.output
		.unwrap_or_else(|| base_dir.join(&config.output));
	save_index(&output, &index)
		.with_context(|| format!("Failed to write index: {}", output.display()))?;
	println!("Index written to: {}", output.display());

	if let Some(dump) = args.dump {
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
