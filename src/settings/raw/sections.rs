use std::path::PathBuf;

use navdex::EngineConfig;
use navdex::logging::LogOptions;
use serde::Deserialize;

use crate::cli::CliArgs;

/// `[index]`: where index files live and how far the search climbs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct IndexSection {
	pub(super) file_name: Option<String>,
	pub(super) auto_file_name: Option<String>,
	pub(super) only_mine: Option<bool>,
	pub(super) filesystem_root: Option<PathBuf>,
	pub(super) max_ascent: Option<usize>,
}

impl IndexSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(root) = cli.fs_root.clone() {
			self.filesystem_root = Some(root);
		}
		if cli.all_owners {
			self.only_mine = Some(false);
		}
	}

	pub(super) fn apply_to(self, engine: &mut EngineConfig) {
		if let Some(name) = self.file_name {
			engine.index_file_name = name.trim().to_string();
		}
		if let Some(name) = self.auto_file_name {
			engine.auto_file_name = name.trim().to_string();
		}
		if let Some(only_mine) = self.only_mine {
			engine.only_mine = only_mine;
		}
		if let Some(root) = self.filesystem_root {
			engine.fs_root = engine.absolute(&root);
		}
		if let Some(max_ascent) = self.max_ascent {
			engine.max_ascent = max_ascent;
		}
	}
}

/// `[resolve]`: bounds on multi-pattern resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ResolveSection {
	pub(super) max_depth: Option<usize>,
}

impl ResolveSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(depth) = cli.max_depth {
			self.max_depth = Some(depth);
		}
	}

	pub(super) fn apply_to(self, engine: &mut EngineConfig) {
		if let Some(depth) = self.max_depth {
			engine.max_depth = depth;
		}
	}
}

/// `[display]`: menu rendering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct DisplaySection {
	pub(super) color: Option<bool>,
}

impl DisplaySection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if cli.no_color {
			self.color = Some(false);
		}
	}

	pub(super) fn apply_to(self, engine: &mut EngineConfig) {
		if let Some(color) = self.color {
			engine.color = color;
		}
	}
}

/// `[log]`: the diagnostics file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct LogSection {
	pub(super) level: Option<String>,
	pub(super) enabled: Option<bool>,
	pub(super) file: Option<PathBuf>,
}

impl LogSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(level) = cli.log_level.clone() {
			self.level = Some(level);
		}
	}

	pub(super) fn finalize(self) -> LogOptions {
		let defaults = LogOptions::default();
		LogOptions {
			enabled: self.enabled.unwrap_or(defaults.enabled),
			level: self
				.level
				.map(|level| level.trim().to_string())
				.unwrap_or(defaults.level),
			file: self.file,
		}
	}
}
