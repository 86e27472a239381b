use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_FILE: &str = ".navdex-index";
pub const DEFAULT_AUTO_FILE: &str = ".navdex-auto";

/// Upper bound on directories visited while walking towards the filesystem
/// root in search of an index file.
pub const DEFAULT_MAX_ASCENT: usize = 64;

/// Upper bound on pattern groups resolved in one call.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Everything the engine needs to know about its surroundings.
///
/// The value is threaded through index loading, matching and resolution so
/// that tests can sandbox the whole engine inside a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
	/// Ceiling for the ancestor walk; nothing above it is searched.
	pub fs_root: PathBuf,
	/// Directory of the outermost index, used as the fallback.
	pub home: PathBuf,
	/// Working directory a resolution starts from.
	pub cwd: PathBuf,
	pub index_file_name: String,
	pub auto_file_name: String,
	/// Skip index files owned by other users (the home index is exempt).
	pub only_mine: bool,
	pub max_ascent: usize,
	pub max_depth: usize,
	pub color: bool,
}

impl EngineConfig {
	pub fn new(home: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
		Self {
			fs_root: PathBuf::from("/"),
			home: home.into(),
			cwd: cwd.into(),
			index_file_name: DEFAULT_INDEX_FILE.to_string(),
			auto_file_name: DEFAULT_AUTO_FILE.to_string(),
			only_mine: true,
			max_ascent: DEFAULT_MAX_ASCENT,
			max_depth: DEFAULT_MAX_DEPTH,
			color: true,
		}
	}

	pub fn with_fs_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.fs_root = root.into();
		self
	}

	pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
		self.cwd = cwd.into();
		self
	}

	pub fn home_index(&self) -> PathBuf {
		self.home.join(&self.index_file_name)
	}

	pub fn index_in(&self, dir: &Path) -> PathBuf {
		dir.join(&self.index_file_name)
	}

	/// Anchor `path` at the working directory when it is relative.
	pub fn absolute(&self, path: &Path) -> PathBuf {
		if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.cwd.join(path)
		}
	}
}
