//! Subcommand implementations.

pub mod build;
pub mod export;
pub mod inspect;

use std::path::Path;

/// Directory that relative paths in a config file resolve against.
pub fn config_dir(config_path: &Path) -> &Path {
	config_path.parent().unwrap_or(Path::new("."))
}
