use std::path::PathBuf;

use anyhow::{Result, anyhow};
use config::{Config, ConfigError, File};
use navdex::app_dirs;

use crate::cli::CliArgs;

pub(super) const ENV_PREFIX: &str = "navdex";

/// Build a [`Config`] instance by combining default locations with CLI overrides.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(File::from(path).required(false));
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
	}

	builder = builder.add_source(
		config::Environment::with_prefix(ENV_PREFIX)
			.separator("__")
			.try_parsing(true),
	);

	builder.build().map_err(|err| match err {
		ConfigError::Frozen => anyhow!("configuration builder is frozen"),
		other => other.into(),
	})
}

/// Configuration files consulted unless `--no-config` is given.
pub(super) fn default_config_files() -> Vec<PathBuf> {
	app_dirs::get_config_dir()
		.map(|dir| vec![dir.join("config.toml")])
		.unwrap_or_default()
}
