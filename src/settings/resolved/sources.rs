use std::fmt;

#[derive(Debug, Clone)]
pub(crate) enum SettingSource {
	CliFlag(&'static str),
	Environment(&'static str),
	ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Where each validated setting came from, when it was set at all.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	pub(crate) index_file_name: Option<SettingSource>,
	pub(crate) index_auto_file_name: Option<SettingSource>,
	pub(crate) index_filesystem_root: Option<SettingSource>,
	pub(crate) index_max_ascent: Option<SettingSource>,
	pub(crate) resolve_max_depth: Option<SettingSource>,
	pub(crate) log_level: Option<SettingSource>,
}

impl ConfigSources {
	/// Origin of `key`, falling back to the configuration key itself.
	pub(crate) fn source_for(&self, key: &'static str) -> SettingSource {
		let found = match key {
			"index.file_name" => &self.index_file_name,
			"index.auto_file_name" => &self.index_auto_file_name,
			"index.filesystem_root" => &self.index_filesystem_root,
			"index.max_ascent" => &self.index_max_ascent,
			"resolve.max_depth" => &self.resolve_max_depth,
			"log.level" => &self.log_level,
			_ => &None,
		};
		found.clone().unwrap_or(SettingSource::ConfigKey(key))
	}
}
