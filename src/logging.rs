//! File-backed diagnostics.
//!
//! Stdout carries the resolved directory for the shell wrapper and stderr
//! carries the interactive menu, so log records go to a file in the data
//! directory instead of either stream.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs;

const LOG_FILE_NAME: &str = "navdex.log";
const LOG_FILTER_ENV: &str = "NAVDEX_LOG";

/// Logging preferences resolved from configuration.
#[derive(Debug, Clone)]
pub struct LogOptions {
	pub enabled: bool,
	/// Default filter directive, e.g. `info` or `navdex=debug`.
	pub level: String,
	/// Log file location; `None` selects `navdex.log` in the data directory.
	pub file: Option<PathBuf>,
}

impl Default for LogOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			level: "info".to_string(),
			file: None,
		}
	}
}

impl LogOptions {
	fn resolve_file(&self) -> Option<PathBuf> {
		if let Some(file) = &self.file {
			return Some(file.clone());
		}
		app_dirs::get_data_dir()
			.ok()
			.map(|dir| dir.join(LOG_FILE_NAME))
	}
}

/// Install the global subscriber. Returns `false` when logging stays off,
/// either by request or because the log file could not be opened.
pub fn initialize(options: &LogOptions) -> bool {
	if !options.enabled {
		return false;
	}
	let Some(path) = options.resolve_file() else {
		return false;
	};
	if let Some(dir) = path.parent() {
		let _ = fs::create_dir_all(dir);
	}
	let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
		return false;
	};

	let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
		.or_else(|_| EnvFilter::try_new(&options.level))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(Mutex::new(file))
		.with_ansi(false)
		.with_target(false)
		.try_init()
		.is_ok()
}
