use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the resolution engine and the index commands.
#[derive(Debug, Error)]
pub enum NavdexError {
	/// A path that must be a directory is missing or is something else.
	#[error("not a directory: {}", .0.display())]
	InvalidDirectory(PathBuf),

	/// The entry is already indexed with the requested priority.
	#[error("{path} is already in the index with priority {priority}")]
	AlreadyPresent { path: String, priority: u32 },

	/// No index file exists between the starting directory and the
	/// filesystem root, and there is no home index either.
	#[error("no index found from {} (searched {steps} directories)", start.display())]
	NoIndexFound { start: PathBuf, steps: usize },

	#[error("invalid pattern '{pattern}': {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: globset::Error,
	},

	#[error("invalid regular expression '{pattern}': {source}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("{}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// Raw terminal setup or key input failed.
	#[error("terminal error: {0}")]
	Terminal(#[source] io::Error),
}

impl NavdexError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}

pub type Result<T, E = NavdexError> = std::result::Result<T, E>;
