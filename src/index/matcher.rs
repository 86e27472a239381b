use std::cmp::Ordering;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use tracing::debug;

use super::store::IndexStore;
use crate::error::{NavdexError, Result};

/// A ranked match produced from an index chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchCandidate {
	/// Relative to the root of the store the search started from, or
	/// absolute when that reading would be wrong.
	pub path: String,
	pub priority: u32,
}

impl MatchCandidate {
	pub fn new(path: impl Into<String>, priority: u32) -> Self {
		Self {
			path: path.into(),
			priority,
		}
	}

	/// Compare by `length / priority` without going through floats.
	fn cmp_score(&self, other: &Self) -> Ordering {
		let lhs = self.path.chars().count() as u64 * u64::from(other.priority.max(1));
		let rhs = other.path.chars().count() as u64 * u64::from(self.priority.max(1));
		lhs.cmp(&rhs)
	}
}

/// Stable sort by ascending `length / priority`.
pub fn rank(candidates: &mut [MatchCandidate]) {
	candidates.sort_by(MatchCandidate::cmp_score);
}

fn compile(patterns: &[String]) -> Result<Vec<GlobMatcher>> {
	patterns
		.iter()
		.map(|pattern| {
			Glob::new(pattern)
				.map(|glob| glob.compile_matcher())
				.map_err(|source| NavdexError::InvalidPattern {
					pattern: pattern.clone(),
					source,
				})
		})
		.collect()
}

fn push_unique(out: &mut Vec<MatchCandidate>, candidate: MatchCandidate) {
	if !out.contains(&candidate) {
		out.push(candidate);
	}
}

impl IndexStore {
	/// Match every pattern against the chain and rank the survivors.
	///
	/// Each pattern narrows the candidates from the previous one; an entry
	/// survives a pattern when any of its `/`-separated segments matches
	/// the glob. `cwd` decides whether a relative entry can be left
	/// relative: only paths that exist as directories from there are. With
	/// `full_dirname` every result is absolute.
	pub fn match_paths(
		&self,
		patterns: &[String],
		cwd: &Path,
		full_dirname: bool,
	) -> Result<Vec<MatchCandidate>> {
		let matchers = compile(patterns)?;
		let mut found = Vec::new();
		self.collect_matches(&matchers, cwd, full_dirname, &mut found);
		rank(&mut found);
		debug!(?patterns, matches = found.len(), "matched index chain");
		Ok(found)
	}

	fn collect_matches(
		&self,
		matchers: &[GlobMatcher],
		cwd: &Path,
		full_dirname: bool,
		out: &mut Vec<MatchCandidate>,
	) {
		let survivors = self.entries().iter().filter(|entry| {
			matchers.iter().all(|matcher| {
				entry
					.path
					.split('/')
					.any(|segment| matcher.is_match(segment))
			})
		});

		for entry in survivors {
			let keep_relative = !full_dirname
				&& !Path::new(&entry.path).is_absolute()
				&& cwd.join(&entry.path).is_dir();
			let path = if keep_relative {
				entry.path.clone()
			} else {
				self.abs_path(&entry.path).to_string_lossy().into_owned()
			};
			push_unique(out, MatchCandidate::new(path, entry.priority));
		}

		if let Some(outer) = self.outer() {
			outer.collect_matches(matchers, cwd, true, out);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	fn globs(patterns: &[&str]) -> Vec<String> {
		patterns.iter().map(|p| p.to_string()).collect()
	}

	fn fixture() -> (tempfile::TempDir, IndexStore) {
		let dir = tempdir().unwrap();
		for sub in [
			"projects/myproject",
			"projects/otherproject",
			"work/client1/site1",
			"work/client1/site2",
			"work/client2",
			"personal/docs",
		] {
			fs::create_dir_all(dir.path().join(sub)).unwrap();
		}
		let text = "projects/myproject 3\nprojects/otherproject 1\nwork/client1/site1 2\nwork/client1/site2 1\nwork/client2 1\npersonal/docs 1\n";
		let store = IndexStore::parse(dir.path().join(".navdex-index"), text);
		(dir, store)
	}

	#[test]
	fn substring_pattern_matches_both_projects() {
		let (dir, store) = fixture();
		let found = store.match_paths(&globs(&["*project*"]), dir.path(), false).unwrap();
		let paths: Vec<_> = found.iter().map(|c| c.path.as_str()).collect();
		assert_eq!(paths, vec!["projects/myproject", "projects/otherproject"]);

		let found = store.match_paths(&globs(&["*myproject*"]), dir.path(), false).unwrap();
		assert_eq!(found, vec![MatchCandidate::new("projects/myproject", 3)]);
	}

	#[test]
	fn patterns_are_conjunctive() {
		let (dir, store) = fixture();
		let found = store
			.match_paths(&globs(&["*work*", "*site*"]), dir.path(), false)
			.unwrap();
		let paths: Vec<_> = found.iter().map(|c| c.path.as_str()).collect();
		assert_eq!(paths, vec!["work/client1/site1", "work/client1/site2"]);
	}

	#[test]
	fn globs_match_whole_segments() {
		let (dir, store) = fixture();
		let found = store.match_paths(&globs(&["client?"]), dir.path(), false).unwrap();
		assert_eq!(found.len(), 3);
		let none = store.match_paths(&globs(&["client"]), dir.path(), false).unwrap();
		assert!(none.is_empty());
	}

	#[test]
	fn no_match_is_empty_not_an_error() {
		let (dir, store) = fixture();
		let found = store.match_paths(&globs(&["*nonexistent*"]), dir.path(), false).unwrap();
		assert!(found.is_empty());
	}

	#[test]
	fn invalid_glob_is_reported() {
		let (dir, store) = fixture();
		let err = store.match_paths(&globs(&["[unclosed"]), dir.path(), false).unwrap_err();
		assert!(matches!(err, NavdexError::InvalidPattern { .. }));
	}

	#[test]
	fn missing_or_forced_paths_render_absolute() {
		let (dir, store) = fixture();
		let elsewhere = dir.path().join("personal");
		let found = store.match_paths(&globs(&["*docs*"]), &elsewhere, false).unwrap();
		let expected = dir.path().join("personal/docs");
		assert_eq!(found[0].path, expected.to_string_lossy());

		let found = store.match_paths(&globs(&["*docs*"]), dir.path(), true).unwrap();
		assert_eq!(found[0].path, expected.to_string_lossy());
	}

	#[test]
	fn ranking_prefers_short_and_high_priority() {
		let mut candidates = vec![
			MatchCandidate::new("abcdef", 1),
			MatchCandidate::new("a", 1),
			MatchCandidate::new("abc", 3),
		];
		rank(&mut candidates);
		let paths: Vec<_> = candidates.iter().map(|c| c.path.as_str()).collect();
		assert_eq!(paths, vec!["a", "abc", "abcdef"]);

		let mut tied = vec![MatchCandidate::new("abc", 3), MatchCandidate::new("a", 1)];
		rank(&mut tied);
		assert_eq!(tied[0].path, "abc");
	}

	#[test]
	fn site_with_higher_priority_ranks_first() {
		let (dir, store) = fixture();
		let found = store.match_paths(&globs(&["*client1*"]), dir.path(), false).unwrap();
		assert_eq!(
			found,
			vec![
				MatchCandidate::new("work/client1/site1", 2),
				MatchCandidate::new("work/client1/site2", 1),
			]
		);
	}

	#[test]
	fn chain_union_has_no_duplicates() {
		let dir = tempdir().unwrap();
		fs::create_dir_all(dir.path().join("inner/innerdir")).unwrap();
		fs::create_dir_all(dir.path().join("outerdir")).unwrap();
		let mut inner =
			IndexStore::parse(dir.path().join("inner/.navdex-index"), "innerdir 1\n");
		let outer = IndexStore::parse(
			dir.path().join(".navdex-index"),
			"outerdir 1\ninner/innerdir 1\n",
		);
		inner.set_outer(Some(outer));

		let cwd = dir.path().join("inner");
		let found = inner.match_paths(&globs(&["*dir*"]), &cwd, false).unwrap();
		let paths: Vec<_> = found.iter().map(|c| c.path.as_str()).collect();
		let outer_dir = dir.path().join("outerdir").to_string_lossy().into_owned();
		let inner_abs = dir.path().join("inner/innerdir").to_string_lossy().into_owned();

		assert!(paths.contains(&"innerdir"));
		assert!(paths.contains(&outer_dir.as_str()));
		assert!(paths.contains(&inner_abs.as_str()));
		assert_eq!(found.len(), 3);

		let mut dedup = found.clone();
		dedup.dedup();
		assert_eq!(dedup.len(), found.len());
	}

	#[test]
	fn identical_outer_entries_collapse() {
		let dir = tempdir().unwrap();
		let mut inner = IndexStore::parse(dir.path().join("a/.navdex-index"), "/opt/tools 2\n");
		inner.set_outer(Some(IndexStore::parse(
			dir.path().join(".navdex-index"),
			"/opt/tools 2\n",
		)));
		let found = inner.match_paths(&globs(&["*tools*"]), dir.path(), false).unwrap();
		assert_eq!(found, vec![MatchCandidate::new("/opt/tools", 2)]);
	}
}
