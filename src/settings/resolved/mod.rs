use std::io;

use navdex::EngineConfig;
use navdex::logging::LogOptions;

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
	pub engine: EngineConfig,
	pub log: LogOptions,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	/// Print a human readable summary of the effective configuration on
	/// stderr, leaving stdout to the shell wrapper.
	pub fn print_summary(&self) {
		let _ = summary::write_summary(self, &mut io::stderr().lock());
	}
}
