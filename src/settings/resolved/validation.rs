use super::super::util::{is_plain_file_name, is_valid_log_level};
use super::{ConfigError, ConfigSources, ResolvedConfig};

pub(super) fn validate(config: &ResolvedConfig, sources: &ConfigSources) -> Result<(), ConfigError> {
	let engine = &config.engine;

	for (key, name) in [
		("index.file_name", &engine.index_file_name),
		("index.auto_file_name", &engine.auto_file_name),
	] {
		if !is_plain_file_name(name) {
			return Err(ConfigError::invalid(
				key,
				name.clone(),
				sources.source_for(key),
				"must be a file name without '/'",
			));
		}
	}

	if engine.index_file_name == engine.auto_file_name {
		return Err(ConfigError::invalid(
			"index.auto_file_name",
			engine.auto_file_name.clone(),
			sources.source_for("index.auto_file_name"),
			"must differ from index.file_name",
		));
	}

	if !engine.fs_root.is_dir() {
		return Err(ConfigError::invalid(
			"index.filesystem_root",
			engine.fs_root.display().to_string(),
			sources.source_for("index.filesystem_root"),
			"must be an existing directory",
		));
	}

	if engine.max_ascent == 0 {
		return Err(ConfigError::invalid(
			"index.max_ascent",
			"0",
			sources.source_for("index.max_ascent"),
			"must be at least 1",
		));
	}

	if engine.max_depth == 0 {
		return Err(ConfigError::invalid(
			"resolve.max_depth",
			"0",
			sources.source_for("resolve.max_depth"),
			"must be at least 1",
		));
	}

	if config.log.enabled && !is_valid_log_level(&config.log.level) {
		return Err(ConfigError::invalid(
			"log.level",
			config.log.level.clone(),
			sources.source_for("log.level"),
			"must be off, error, warn, info, debug, trace or a filter directive",
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use navdex::EngineConfig;
	use navdex::logging::LogOptions;

	use super::super::SettingSource;
	use super::*;

	fn config() -> ResolvedConfig {
		ResolvedConfig {
			engine: EngineConfig::new("/home/me", "/"),
			log: LogOptions::default(),
		}
	}

	#[test]
	fn validation_rejects_zero_max_ascent() {
		let mut config = config();
		config.engine.max_ascent = 0;
		let sources = ConfigSources {
			index_max_ascent: Some(SettingSource::Environment("NAVDEX__INDEX__MAX_ASCENT")),
			..ConfigSources::default()
		};

		let err = validate(&config, &sources).unwrap_err();
		assert_eq!(err.key, "index.max_ascent");
		let message = err.to_string();
		assert!(message.contains("value: 0"));
		assert!(message.contains("environment variable"));
	}

	#[test]
	fn validation_rejects_nested_file_names() {
		let mut config = config();
		config.engine.index_file_name = "sub/.navdex-index".into();
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert_eq!(err.key, "index.file_name");
		assert!(err.to_string().contains("configuration key `index.file_name`"));
	}

	#[test]
	fn validation_rejects_clashing_file_names() {
		let mut config = config();
		config.engine.auto_file_name = config.engine.index_file_name.clone();
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert_eq!(err.key, "index.auto_file_name");
	}

	#[test]
	fn validation_rejects_unknown_log_levels() {
		let mut config = config();
		config.log.level = "chatty".into();
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert_eq!(err.key, "log.level");

		config.log.enabled = false;
		assert!(validate(&config, &ConfigSources::default()).is_ok());
	}
}
