use std::env;

use anyhow::{Error, Result};
use navdex::{EngineConfig, app_dirs};
use serde::Deserialize;

use crate::cli::CliArgs;

use super::resolved::{ConfigSources, ResolvedConfig, SettingSource};
use super::util::working_directory;

mod sections;

use sections::{DisplaySection, IndexSection, LogSection, ResolveSection};

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	index: IndexSection,
	resolve: ResolveSection,
	display: DisplaySection,
	log: LogSection,
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		self.index.apply_cli_overrides(cli);
		self.resolve.apply_cli_overrides(cli);
		self.display.apply_cli_overrides(cli);
		self.log.apply_cli_overrides(cli);
	}

	/// Convert the raw configuration into a [`ResolvedConfig`] for the
	/// current user and working directory.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let home = app_dirs::get_home_dir()?;
		let cwd = working_directory()?;
		self.resolve_in(cli, EngineConfig::new(home, cwd))
	}

	/// Layer the settings over `engine`, validating the result.
	pub(super) fn resolve_in(self, cli: &CliArgs, mut engine: EngineConfig) -> Result<ResolvedConfig> {
		let sources = self.sources(cli);

		self.index.apply_to(&mut engine);
		self.resolve.apply_to(&mut engine);
		self.display.apply_to(&mut engine);
		let log = self.log.finalize();

		let config = ResolvedConfig { engine, log };
		config.validate(&sources).map_err(Error::new)?;

		Ok(config)
	}

	fn sources(&self, cli: &CliArgs) -> ConfigSources {
		ConfigSources {
			index_file_name: detect_source(
				false,
				self.index.file_name.is_some(),
				"NAVDEX__INDEX__FILE_NAME",
				None,
				"index.file_name",
			),
			index_auto_file_name: detect_source(
				false,
				self.index.auto_file_name.is_some(),
				"NAVDEX__INDEX__AUTO_FILE_NAME",
				None,
				"index.auto_file_name",
			),
			index_filesystem_root: detect_source(
				cli.fs_root.is_some(),
				self.index.filesystem_root.is_some(),
				"NAVDEX__INDEX__FILESYSTEM_ROOT",
				Some("--fs-root"),
				"index.filesystem_root",
			),
			index_max_ascent: detect_source(
				false,
				self.index.max_ascent.is_some(),
				"NAVDEX__INDEX__MAX_ASCENT",
				None,
				"index.max_ascent",
			),
			resolve_max_depth: detect_source(
				cli.max_depth.is_some(),
				self.resolve.max_depth.is_some(),
				"NAVDEX__RESOLVE__MAX_DEPTH",
				Some("--max-depth"),
				"resolve.max_depth",
			),
			log_level: detect_source(
				cli.log_level.is_some(),
				self.log.level.is_some(),
				"NAVDEX__LOG__LEVEL",
				Some("--log-level"),
				"log.level",
			),
		}
	}
}

fn detect_source(
	cli_present: bool,
	value_present: bool,
	env_var: &'static str,
	cli_flag: Option<&'static str>,
	key: &'static str,
) -> Option<SettingSource> {
	if !value_present {
		return None;
	}

	if cli_present && let Some(flag) = cli_flag {
		return Some(SettingSource::CliFlag(flag));
	}

	if env::var_os(env_var).is_some() {
		return Some(SettingSource::Environment(env_var));
	}

	Some(SettingSource::ConfigKey(key))
}
