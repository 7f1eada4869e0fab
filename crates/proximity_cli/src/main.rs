//! Boundary proximity index builder.
//!
//! Builds, for every element of a tetrahedral mesh, the list of nearby
//! boundary faces and persists it for a particle tracker to load.
//!
//! Subcommands:
//! - build: load a TOML config, load or generate the mesh, build and save
//! - inspect: print summary statistics of a saved index
//! - export: write boundary face coordinates and a per-record text dump

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Boundary proximity index builder for tetrahedral meshes.
#[derive(Parser, Debug)]
#[command(name = "build_proximity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Builds and inspects per-element boundary face indices")]
struct Cli {
	/// Log level (trace, debug, info, warn, error).
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Build an index from a config file.
	Build(commands::build::BuildArgs),
	/// Summarize a saved index.
	Inspect(commands::inspect::InspectArgs),
	/// Export face coordinates and a text dump.
	Export(commands::export::ExportArgs),
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let level = match cli.log_level.to_lowercase().as_str() {
		"trace" => Level::TRACE,
		"debug" => Level::DEBUG,
		"info" => Level::INFO,
		"warn" => Level::WARN,
		"error" => Level::ERROR,
		_ => Level::INFO,
	};

	let subscriber = FmtSubscriber::builder()
		.with_max_level(level)
		.with_target(false)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	match cli.command {
		Commands::Build(args) => commands::build::execute(args),
		Commands::Inspect(args) => commands::inspect::execute(args),
		Commands::Export(args) => commands::export::execute(args),
	}
}
