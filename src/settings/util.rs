use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::crossterm::terminal;

/// Filter levels accepted for `log.level`.
pub(super) const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// The directory the user believes they are in.
///
/// `PWD` keeps symlinked paths the way the shell shows them, so it wins over
/// the kernel's view as long as both name the same directory.
pub(super) fn working_directory() -> Result<PathBuf> {
	let actual = env::current_dir().context("failed to determine working directory")?;
	Ok(env::var_os("PWD")
		.map(PathBuf::from)
		.filter(|pwd| pwd.is_absolute() && same_directory(pwd, &actual))
		.unwrap_or(actual))
}

fn same_directory(a: &Path, b: &Path) -> bool {
	match (fs::canonicalize(a), fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => false,
	}
}

/// Width of the controlling terminal, when there is one.
pub(crate) fn terminal_width() -> Option<usize> {
	terminal::size().ok().map(|(columns, _)| usize::from(columns))
}

/// Whether `level` is a bare level name or a filter directive list.
pub(super) fn is_valid_log_level(level: &str) -> bool {
	let level = level.trim();
	if level.is_empty() {
		return false;
	}
	LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) || level.contains('=')
}

/// File names must name a single entry inside a directory.
pub(super) fn is_plain_file_name(name: &str) -> bool {
	!name.is_empty() && name != "." && name != ".." && !name.contains('/')
}
