use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{NavdexError, Result};

/// First-line marker flagging an index as created on purpose rather than
/// implicitly. It is carried through rewrites untouched.
pub const PROTECT_MARKER: &str = "#protect";

const DEFAULT_PRIORITY: u32 = 1;

/// One bookmarked directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
	/// Relative to the owning index's root, or absolute when the directory
	/// lives outside it.
	pub path: String,
	pub priority: u32,
}

impl IndexEntry {
	pub fn new(path: impl Into<String>, priority: u32) -> Self {
		Self {
			path: path.into(),
			priority: priority.max(DEFAULT_PRIORITY),
		}
	}

	/// Parse a data line. Blank lines and `#` comments yield `None`; a missing
	/// or malformed priority falls back to the default.
	fn parse(line: &str) -> Option<Self> {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			return None;
		}

		let (path, token) = match line.split_once(char::is_whitespace) {
			Some((path, rest)) => (path, rest.trim()),
			None => (line, ""),
		};
		let priority = token
			.parse::<u32>()
			.ok()
			.filter(|priority| *priority >= DEFAULT_PRIORITY)
			.unwrap_or(DEFAULT_PRIORITY);

		Some(Self {
			path: path.to_string(),
			priority,
		})
	}
}

/// Result of a successful [`IndexStore::add_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
	Added,
	Updated { previous: u32 },
}

/// Summary of an [`IndexStore::clean`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
	/// Absolute locations of the stale entries that were dropped.
	pub removed: Vec<PathBuf>,
	pub remaining: usize,
}

/// The parsed contents of one index file plus an optional link to the store
/// of the enclosing tree.
///
/// Entries are kept sorted by path and unique by path.
#[derive(Debug)]
pub struct IndexStore {
	path: PathBuf,
	root: PathBuf,
	entries: Vec<IndexEntry>,
	protected: bool,
	outer: Option<Box<IndexStore>>,
}

impl IndexStore {
	/// Read and parse the index file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|err| NavdexError::io(path, err))?;
		let store = Self::parse(path, &text);
		debug!(
			index = %path.display(),
			entries = store.entries.len(),
			protected = store.protected,
			"loaded index"
		);
		Ok(store)
	}

	/// Build a store from index text as if it had been read from `path`.
	pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
		let protected = text
			.lines()
			.map(str::trim)
			.find(|line| !line.is_empty())
			.is_some_and(|line| line.starts_with(PROTECT_MARKER));

		let mut entries: Vec<IndexEntry> = text.lines().filter_map(IndexEntry::parse).collect();
		entries.sort_by(|a, b| a.path.cmp(&b.path));
		entries.dedup_by(|later, earlier| later.path == earlier.path);

		let mut store = Self::empty(path);
		store.entries = entries;
		store.protected = protected;
		store
	}

	/// A store with no entries that will be written to `path`.
	pub fn empty(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
		Self {
			path,
			root,
			entries: Vec::new(),
			protected: false,
			outer: None,
		}
	}

	/// Location of the index file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Directory holding the index file; relative entries hang off it.
	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn entries(&self) -> &[IndexEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_protected(&self) -> bool {
		self.protected
	}

	pub fn set_protected(&mut self, protected: bool) {
		self.protected = protected;
	}

	pub fn outer(&self) -> Option<&IndexStore> {
		self.outer.as_deref()
	}

	pub fn set_outer(&mut self, outer: Option<IndexStore>) {
		self.outer = outer.map(Box::new);
	}

	/// Detach and return the enclosing store, dropping this one.
	pub fn into_outer(self) -> Option<IndexStore> {
		self.outer.map(|outer| *outer)
	}

	/// Iterate from this store outwards through the chain.
	pub fn chain(&self) -> impl Iterator<Item = &IndexStore> {
		std::iter::successors(Some(self), |store| store.outer())
	}

	/// True when neither this store nor, if it has no entries, any store
	/// further out has anything to match against.
	pub fn is_empty(&self) -> bool {
		if !self.entries.is_empty() {
			return false;
		}
		self.outer().is_none_or(IndexStore::is_empty)
	}

	/// Resolve an entry path against this store's root.
	pub fn abs_path(&self, entry: &str) -> PathBuf {
		let candidate = Path::new(entry);
		if candidate.is_absolute() {
			candidate.to_path_buf()
		} else if entry == "." {
			self.root.clone()
		} else {
			self.root.join(candidate)
		}
	}

	/// Express `dir` relative to this store's root when it lies under it.
	/// Anything else is returned unchanged.
	pub fn relative_path(&self, dir: &str) -> String {
		let trimmed = if dir.len() > 1 {
			dir.trim_end_matches('/')
		} else {
			dir
		};
		let candidate = Path::new(trimmed);
		if candidate.is_absolute()
			&& let Ok(rel) = candidate.strip_prefix(&self.root)
		{
			if rel.as_os_str().is_empty() {
				return ".".to_string();
			}
			return rel.to_string_lossy().into_owned();
		}
		trimmed.to_string()
	}

	/// Insert `dir` with `priority`, or update the priority of an existing
	/// entry. Re-adding an identical entry is reported as
	/// [`NavdexError::AlreadyPresent`] and changes nothing.
	pub fn add_dir(&mut self, dir: &str, priority: u32) -> Result<AddOutcome> {
		let rel = self.relative_path(dir);
		let priority = priority.max(DEFAULT_PRIORITY);

		match self
			.entries
			.binary_search_by(|entry| entry.path.as_str().cmp(rel.as_str()))
		{
			Ok(pos) => {
				let entry = &mut self.entries[pos];
				if entry.priority == priority {
					return Err(NavdexError::AlreadyPresent {
						path: rel,
						priority,
					});
				}
				let previous = entry.priority;
				entry.priority = priority;
				debug!(path = %rel, previous, priority, "updated index entry");
				Ok(AddOutcome::Updated { previous })
			}
			Err(pos) => {
				debug!(path = %rel, priority, "added index entry");
				self.entries.insert(pos, IndexEntry::new(rel, priority));
				Ok(AddOutcome::Added)
			}
		}
	}

	/// Priority recorded for `dir`, if it is indexed.
	pub fn priority_of(&self, dir: &str) -> Option<u32> {
		let rel = self.relative_path(dir);
		self.entries
			.binary_search_by(|entry| entry.path.as_str().cmp(rel.as_str()))
			.ok()
			.map(|pos| self.entries[pos].priority)
	}

	/// Remove the entry for `dir`. Returns whether anything was removed.
	pub fn del_dir(&mut self, dir: &str) -> bool {
		let rel = self.relative_path(dir);
		match self
			.entries
			.binary_search_by(|entry| entry.path.as_str().cmp(rel.as_str()))
		{
			Ok(pos) => {
				self.entries.remove(pos);
				debug!(path = %rel, "removed index entry");
				true
			}
			Err(_) => false,
		}
	}

	/// Drop entries whose directory no longer exists and persist the result.
	pub fn clean(&mut self) -> Result<CleanReport> {
		let mut removed = Vec::new();
		let root = self.root.clone();
		self.entries.retain(|entry| {
			let full = absolute_under(&root, &entry.path);
			if full.is_dir() {
				true
			} else {
				removed.push(full);
				false
			}
		});

		self.write()?;
		info!(
			index = %self.path.display(),
			removed = removed.len(),
			remaining = self.entries.len(),
			"cleaned index"
		);

		Ok(CleanReport {
			removed,
			remaining: self.entries.len(),
		})
	}

	/// Serialise the store in its on-disk form.
	pub fn render(&self) -> String {
		let mut out = String::new();
		if self.protected {
			out.push_str(PROTECT_MARKER);
			out.push('\n');
		}
		for entry in &self.entries {
			out.push_str(&entry.path);
			out.push(' ');
			out.push_str(&entry.priority.to_string());
			out.push('\n');
		}
		out
	}

	/// Persist the store by writing a sibling temporary file and renaming it
	/// over the index.
	pub fn write(&self) -> Result<()> {
		let data = self.render();
		let tmp_path = sibling_tmp_path(&self.path);
		{
			let mut file =
				File::create(&tmp_path).map_err(|err| NavdexError::io(&tmp_path, err))?;
			file.write_all(data.as_bytes())
				.map_err(|err| NavdexError::io(&tmp_path, err))?;
			if let Err(err) = file.sync_all() {
				warn!(path = %tmp_path.display(), %err, "failed to sync index before rename");
			}
		}

		fs::rename(&tmp_path, &self.path).map_err(|err| NavdexError::io(&self.path, err))?;
		debug!(index = %self.path.display(), entries = self.entries.len(), "wrote index");
		Ok(())
	}
}

fn absolute_under(root: &Path, entry: &str) -> PathBuf {
	let candidate = Path::new(entry);
	if candidate.is_absolute() {
		candidate.to_path_buf()
	} else {
		root.join(candidate)
	}
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
	let mut name = path
		.file_name()
		.map(OsString::from)
		.unwrap_or_default();
	name.push(".tmp");
	path.with_file_name(name)
}
