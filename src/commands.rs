//! Index maintenance commands.
//!
//! Every command returns a [`Report`]: notes meant for the user's terminal
//! and, optionally, a single sentinel-prefixed line for the shell wrapper.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{NavdexError, Result};
use crate::index::{AUTO_TEMPLATE, AddOutcome, AutoContent, IndexStore, find_index, load_chain};
use crate::resolve::{COMMAND_SENTINEL, MESSAGE_SENTINEL};

const NEW_ENTRY_PRIORITY: u32 = 1;

/// What a command has to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
	/// Human-readable lines for stderr.
	pub notes: Vec<String>,
	/// Line for the shell wrapper on stdout, sentinel included.
	pub shell: Option<String>,
	pub success: bool,
}

impl Default for Report {
	fn default() -> Self {
		Self {
			notes: Vec::new(),
			shell: None,
			success: true,
		}
	}
}

impl Report {
	fn note(mut self, line: impl Into<String>) -> Self {
		self.notes.push(line.into());
		self
	}

	fn failed(mut self) -> Self {
		self.success = false;
		self
	}

	fn message(mut self, lines: &[String]) -> Self {
		self.shell = Some(format!("{MESSAGE_SENTINEL}{}", lines.join("\n")));
		self
	}

	fn command(mut self, command: String) -> Self {
		self.shell = Some(format!("{COMMAND_SENTINEL}{command}"));
		self
	}

	pub fn exit_code(&self) -> u8 {
		if self.success { 0 } else { 1 }
	}
}

/// Create the home index on first use. Returns its path when it was created.
pub fn ensure_home_index(config: &EngineConfig) -> Result<Option<PathBuf>> {
	let path = config.home_index();
	if path.is_file() {
		return Ok(None);
	}
	let header = format!(
		"# This is your HOME dir {}, try 'navdex --help'\n",
		config.index_file_name
	);
	fs::write(&path, header).map_err(|err| NavdexError::io(&path, err))?;
	info!(index = %path.display(), "created home index");
	Ok(Some(path))
}

/// Create a protected, empty index in the working directory.
pub fn create_index_here(config: &EngineConfig) -> Result<Report> {
	let path = config.index_in(&config.cwd);
	if path.exists() {
		return Ok(Report::default()
			.note(format!("An index already exists in {}", config.cwd.display()))
			.failed());
	}

	let mut store = IndexStore::empty(&path);
	store.set_protected(true);
	store.write()?;
	info!(index = %path.display(), "created index");
	Ok(Report::default().note(format!("Index has been created in {}", config.cwd.display())))
}

/// Index `dir` (default: the working directory) and, with `recurse`, every
/// non-hidden directory below it. Without an explicit `priority` existing
/// entries keep theirs and new ones get priority 1.
pub fn add_dirs(config: &EngineConfig, dir: Option<&Path>, priority: Option<u32>, recurse: bool) -> Result<Report> {
	let target = dir.map_or_else(|| config.cwd.clone(), |dir| config.absolute(dir));
	if !target.is_dir() {
		return Err(NavdexError::InvalidDirectory(target));
	}

	let mut store = load_chain(config, &config.cwd, false)?;
	let mut dirs = vec![target.clone()];
	if recurse {
		dirs.extend(subdirectories(&target));
	}

	let mut report = Report::default();
	let mut changed = false;
	for dir in dirs {
		let shown = dir.display().to_string();
		let priority = match (priority, store.priority_of(&shown)) {
			(Some(priority), _) => priority,
			(None, Some(_)) => {
				report = report.note(format!("{shown} is already in the index"));
				continue;
			}
			(None, None) => NEW_ENTRY_PRIORITY,
		};
		match store.add_dir(&shown, priority) {
			Ok(AddOutcome::Added) => {
				changed = true;
				report = report.note(format!("added {shown}:{priority} to {}", store.path().display()));
			}
			Ok(AddOutcome::Updated { previous }) => {
				changed = true;
				report = report.note(format!("updated {shown}:{priority} (was {previous})"));
			}
			Err(NavdexError::AlreadyPresent { .. }) => {
				report = report.note(format!("{shown} is already in the index"));
			}
			Err(err) => return Err(err),
		}
	}

	if changed {
		store.write()?;
	}
	Ok(report)
}

fn subdirectories(root: &Path) -> Vec<PathBuf> {
	WalkBuilder::new(root)
		.hidden(true)
		.git_ignore(false)
		.git_global(false)
		.git_exclude(false)
		.ignore(false)
		.parents(false)
		.sort_by_file_name(|a, b| a.cmp(b))
		.build()
		.filter_map(|entry| match entry {
			Ok(entry) => Some(entry),
			Err(err) => {
				warn!(%err, "skipping unreadable entry");
				None
			}
		})
		.filter(|entry| entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_dir()))
		.map(|entry| entry.into_path())
		.collect()
}

/// Remove the working directory from the governing index.
pub fn del_dir(config: &EngineConfig) -> Result<Report> {
	let mut store = load_chain(config, &config.cwd, false)?;
	let cwd = config.cwd.display().to_string();
	if store.del_dir(&cwd) {
		store.write()?;
		Ok(Report::default().note(format!("{cwd} removed from {}", store.path().display())))
	} else {
		Ok(Report::default()
			.note(format!("{cwd} was not found in the index"))
			.failed())
	}
}

/// Drop stale entries from the governing index.
pub fn clean_index(config: &EngineConfig) -> Result<Report> {
	let mut store = load_chain(config, &config.cwd, false)?;
	let cleaned = store.clean()?;
	let mut report = Report::default();
	for path in &cleaned.removed {
		report = report.note(format!("Stale dir removed: {}", path.display()));
	}
	Ok(report.note(format!(
		"Cleaned index {}: {} dirs remain",
		store.path().display(),
		cleaned.remaining
	)))
}

/// Describe the governing index and every index enclosing it.
pub fn index_info(config: &EngineConfig) -> Result<Report> {
	let nearest = find_index(config, &config.cwd)?;
	let root = nearest.parent().map_or_else(|| config.cwd.clone(), Path::to_path_buf);
	let chain = load_chain(config, &root, true)?;

	let mut lines = Vec::new();
	for (level, store) in chain.chain().enumerate() {
		if level > 0 {
			lines.push("   ===  Outer: === ".to_string());
		}
		lines.push(format!("PWD: {}", store.root().display()));
		lines.push(format!("Index: {}", store.path().display()));
		lines.push(format!("# of dirs in index: {}", store.len()));
		if store.is_protected() {
			lines.push("protected".to_string());
		}
		if config.cwd == store.root() {
			lines.push("PWD == index root".to_string());
		}
	}
	Ok(Report::default().message(&lines))
}

/// Ask the wrapper to open the governing index in `$EDITOR`.
pub fn edit_index(config: &EngineConfig) -> Result<Report> {
	let path = find_index(config, &config.cwd)?;
	Ok(Report::default().command(format!("$EDITOR {}", path.display())))
}

/// Ask the wrapper to edit the working directory's description file,
/// creating it from the template first when missing.
pub fn edit_auto_here(config: &EngineConfig) -> Result<Report> {
	let path = config.cwd.join(&config.auto_file_name);
	let mut report = Report::default();
	if !path.exists() {
		fs::write(&path, AUTO_TEMPLATE).map_err(|err| NavdexError::io(&path, err))?;
		debug!(path = %path.display(), "created description file");
		report = report.note(format!("Created {}", path.display()));
	}
	Ok(report.command(format!("$EDITOR {}", path.display())))
}

/// List every directory of the governing index with its tags and
/// description, keeping only lines matching `pattern` when given.
pub fn grep(config: &EngineConfig, pattern: Option<&str>) -> Result<Report> {
	let regex = pattern
		.map(|pattern| {
			Regex::new(pattern).map_err(|source| NavdexError::InvalidRegex {
				pattern: pattern.to_string(),
				source,
			})
		})
		.transpose()?;

	let store = load_chain(config, &config.cwd, false)?;
	let lines: Vec<String> = store
		.entries()
		.iter()
		.map(|entry| describe(config, &store.abs_path(&entry.path)))
		.filter(|line| regex.as_ref().is_none_or(|regex| regex.is_match(line)))
		.collect();

	debug!(?pattern, matches = lines.len(), "grep over index");
	let report = Report::default().message(&lines);
	Ok(if lines.is_empty() { report.failed() } else { report })
}

fn describe(config: &EngineConfig, dir: &Path) -> String {
	let mut line = dir.display().to_string();
	let auto = dir.join(&config.auto_file_name);
	if auto.is_file() {
		match AutoContent::load(&auto) {
			Ok(content) => {
				line.push_str(&format!(" [.TAGS: {}] ", content.tags().join(",")));
				line.push_str(content.desc());
			}
			Err(err) => warn!(%err, "unreadable description file"),
		}
	}
	line
}

#[cfg(test)]
mod tests {
	use tempfile::{TempDir, tempdir};

	use super::*;

	fn sandbox() -> (TempDir, EngineConfig) {
		let dir = tempdir().unwrap();
		let root = fs::canonicalize(dir.path()).unwrap();
		let home = root.join("home");
		fs::create_dir_all(&home).unwrap();
		let config = EngineConfig::new(&home, &home).with_fs_root(&root);
		(dir, config)
	}

	fn index_text(config: &EngineConfig) -> String {
		fs::read_to_string(config.home_index()).unwrap()
	}

	#[test]
	fn home_index_is_created_once() {
		let (_dir, config) = sandbox();
		assert_eq!(ensure_home_index(&config).unwrap(), Some(config.home_index()));
		assert!(index_text(&config).starts_with("# This is your HOME dir"));
		assert_eq!(ensure_home_index(&config).unwrap(), None);
	}

	#[test]
	fn created_index_is_protected() {
		let (_dir, config) = sandbox();
		let proj = config.home.join("proj");
		fs::create_dir_all(&proj).unwrap();
		let config = config.with_cwd(&proj);

		let report = create_index_here(&config).unwrap();
		assert!(report.success);
		let store = IndexStore::load(proj.join(".navdex-index")).unwrap();
		assert!(store.is_protected());
		assert_eq!(store.len(), 0);

		let again = create_index_here(&config).unwrap();
		assert!(!again.success);
		assert!(again.notes[0].starts_with("An index already exists"));
	}

	#[test]
	fn add_then_readd_reports_no_op() {
		let (_dir, config) = sandbox();
		ensure_home_index(&config).unwrap();
		let work = config.home.join("work");
		fs::create_dir_all(&work).unwrap();

		let report = add_dirs(&config, Some(Path::new("work")), Some(2), false).unwrap();
		assert!(report.notes[0].starts_with(&format!("added {}:2", work.display())));
		assert!(index_text(&config).contains("work 2\n"));

		let report = add_dirs(&config, Some(&work), Some(2), false).unwrap();
		assert_eq!(report.notes, vec![format!("{} is already in the index", work.display())]);

		let report = add_dirs(&config, Some(&work), Some(5), false).unwrap();
		assert!(report.notes[0].starts_with("updated"));
		assert!(index_text(&config).contains("work 5\n"));
	}

	#[test]
	fn add_without_priority_keeps_existing_entries() {
		let (_dir, config) = sandbox();
		fs::create_dir_all(config.home.join("work/new")).unwrap();
		fs::write(config.home_index(), "work 5\n").unwrap();
		let work = config.home.join("work");

		let report = add_dirs(&config, Some(Path::new("work")), None, true).unwrap();
		assert_eq!(report.notes[0], format!("{} is already in the index", work.display()));
		assert!(report.notes[1].starts_with(&format!("added {}:1", work.join("new").display())));
		assert_eq!(index_text(&config), "work 5\nwork/new 1\n");
	}

	#[test]
	fn recursive_add_skips_hidden_directories() {
		let (_dir, config) = sandbox();
		ensure_home_index(&config).unwrap();
		for sub in ["src/a", "src/b", "src/.git/objects"] {
			fs::create_dir_all(config.home.join(sub)).unwrap();
		}

		add_dirs(&config, Some(Path::new("src")), None, true).unwrap();
		let store = IndexStore::load(config.home_index()).unwrap();
		let paths: Vec<_> = store.entries().iter().map(|e| e.path.as_str()).collect();
		assert_eq!(paths, vec!["src", "src/a", "src/b"]);
	}

	#[test]
	fn adding_a_missing_directory_fails() {
		let (_dir, config) = sandbox();
		ensure_home_index(&config).unwrap();
		let err = add_dirs(&config, Some(Path::new("nope")), None, false).unwrap_err();
		assert!(matches!(err, NavdexError::InvalidDirectory(_)));
	}

	#[test]
	fn delete_removes_the_working_directory() {
		let (_dir, config) = sandbox();
		ensure_home_index(&config).unwrap();
		let work = config.home.join("work");
		fs::create_dir_all(&work).unwrap();
		add_dirs(&config, Some(&work), None, false).unwrap();

		let config = config.with_cwd(&work);
		assert!(del_dir(&config).unwrap().success);
		assert!(!index_text(&config).contains("work"));
		assert!(!del_dir(&config).unwrap().success);
	}

	#[test]
	fn clean_reports_stale_directories() {
		let (_dir, config) = sandbox();
		fs::create_dir_all(config.home.join("kept")).unwrap();
		fs::write(config.home_index(), "kept 1\ngone 3\n").unwrap();

		let report = clean_index(&config).unwrap();
		assert_eq!(
			report.notes[0],
			format!("Stale dir removed: {}", config.home.join("gone").display())
		);
		assert!(report.notes[1].ends_with(": 1 dirs remain"));
		assert_eq!(index_text(&config), "kept 1\n");
	}

	#[test]
	fn info_walks_the_chain() {
		let (_dir, config) = sandbox();
		ensure_home_index(&config).unwrap();
		let proj = config.home.join("proj");
		fs::create_dir_all(proj.join("deep")).unwrap();
		fs::write(proj.join(".navdex-index"), "#protect\ndeep 1\n").unwrap();

		let report = index_info(&config.clone().with_cwd(&proj)).unwrap();
		let shell = report.shell.unwrap();
		assert!(shell.starts_with("!PWD: "));
		assert!(shell.contains("# of dirs in index: 1\nprotected\nPWD == index root"));
		assert!(shell.contains("===  Outer: ==="));
		assert!(shell.contains(&config.home_index().display().to_string()));
	}

	#[test]
	fn edit_commands_return_editor_sentinels() {
		let (_dir, config) = sandbox();
		ensure_home_index(&config).unwrap();
		let report = edit_index(&config).unwrap();
		assert_eq!(
			report.shell.unwrap(),
			format!("!!$EDITOR {}", config.home_index().display())
		);

		let report = edit_auto_here(&config).unwrap();
		let auto = config.home.join(".navdex-auto");
		assert_eq!(report.shell.unwrap(), format!("!!$EDITOR {}", auto.display()));
		assert_eq!(fs::read_to_string(&auto).unwrap(), AUTO_TEMPLATE);

		fs::write(&auto, "# .TAGS: mine\n").unwrap();
		edit_auto_here(&config).unwrap();
		assert_eq!(fs::read_to_string(&auto).unwrap(), "# .TAGS: mine\n");
	}

	#[test]
	fn grep_searches_paths_and_descriptions() {
		let (_dir, config) = sandbox();
		for sub in ["tools", "blog"] {
			fs::create_dir_all(config.home.join(sub)).unwrap();
		}
		fs::write(config.home_index(), "blog 1\ntools 1\n").unwrap();
		fs::write(
			config.home.join("tools/.navdex-auto"),
			"# .TAGS: rust cli\n# .DESC: command line helpers\n",
		)
		.unwrap();

		let all = grep(&config, None).unwrap();
		let shell = all.shell.unwrap();
		assert!(shell.starts_with(&format!("!{}", config.home.join("blog").display())));
		assert!(shell.contains("tools [.TAGS: rust,cli]  command line helpers"));

		let hits = grep(&config, Some("helpers")).unwrap();
		assert!(hits.success);
		assert_eq!(hits.shell.unwrap().lines().count(), 1);

		let miss = grep(&config, Some("^nothing$")).unwrap();
		assert!(!miss.success);

		let err = grep(&config, Some("(")).unwrap_err();
		assert!(matches!(err, NavdexError::InvalidRegex { .. }));
	}
}
