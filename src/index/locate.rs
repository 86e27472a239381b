use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::store::IndexStore;
use crate::config::EngineConfig;
use crate::error::{NavdexError, Result};

/// Find the index governing `start`.
///
/// Walks upward from `start` until a usable index file turns up. Once the
/// walk reaches (or starts outside) the filesystem root, the home index is
/// tried as a last resort. The walk is bounded by `max_ascent`; running out
/// of steps or finding no home index yields [`NavdexError::NoIndexFound`].
pub fn find_index(config: &EngineConfig, start: &Path) -> Result<PathBuf> {
	let start = config.absolute(start);
	let mut dir = start.clone();
	let mut steps = 0;

	if !dir.starts_with(&config.fs_root) {
		dir = fs::canonicalize(&dir).unwrap_or(dir);
	}

	while steps < config.max_ascent {
		if !dir.starts_with(&config.fs_root) {
			break;
		}
		steps += 1;

		let candidate = config.index_in(&dir);
		if candidate.is_file() && (dir == config.home || owned_by_me(config, &candidate)) {
			debug!(index = %candidate.display(), steps, "found index");
			return Ok(candidate);
		}

		if dir == config.fs_root {
			break;
		}
		match dir.parent() {
			Some(parent) => dir = parent.to_path_buf(),
			None => break,
		}
	}

	let home_index = config.home_index();
	if home_index.is_file() {
		debug!(index = %home_index.display(), steps, "falling back to home index");
		return Ok(home_index);
	}

	Err(NavdexError::NoIndexFound { start, steps })
}

/// Load the store for `dir`; with `deep`, also link every enclosing store up
/// to and including the home index.
pub fn load_chain(config: &EngineConfig, dir: &Path, deep: bool) -> Result<IndexStore> {
	let dir = config.absolute(dir);
	if !dir.is_dir() {
		return Err(NavdexError::InvalidDirectory(dir));
	}

	let nearest = find_index(config, &dir)?;
	let mut stores = vec![IndexStore::load(&nearest)?];

	if deep {
		while stores.len() < config.max_ascent {
			let Some(last) = stores.last() else { break };
			if last.root() == config.home {
				break;
			}
			let Some(parent) = last.root().parent() else {
				break;
			};

			let next = match find_index(config, parent) {
				Ok(path) => path,
				Err(NavdexError::NoIndexFound { .. }) => break,
				Err(err) => return Err(err),
			};
			if stores.iter().any(|store| store.path() == next) {
				break;
			}
			stores.push(IndexStore::load(&next)?);
		}
	}

	info!(
		start = %dir.display(),
		levels = stores.len(),
		nearest = %nearest.display(),
		"loaded index chain"
	);

	let mut chain: Option<IndexStore> = None;
	while let Some(mut store) = stores.pop() {
		store.set_outer(chain.take());
		chain = Some(store);
	}
	chain.ok_or(NavdexError::NoIndexFound {
		start: dir,
		steps: 0,
	})
}

#[cfg(unix)]
fn owned_by_me(config: &EngineConfig, path: &Path) -> bool {
	use std::os::unix::fs::MetadataExt;

	if !config.only_mine {
		return true;
	}
	// SAFETY: geteuid has no preconditions and cannot fail.
	let me = unsafe { libc::geteuid() };
	fs::metadata(path).is_ok_and(|meta| meta.uid() == me)
}

#[cfg(not(unix))]
fn owned_by_me(_config: &EngineConfig, _path: &Path) -> bool {
	true
}
