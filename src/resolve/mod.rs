//! Turning pattern tokens into a directory.
//!
//! Each [`PatternGroup`] is matched against the index chain governing the
//! current working context. A unique match (or an explicit offset) is taken
//! directly; otherwise the caller's [`ResolveMode`] decides between an
//! interactive prompt, a printable listing or handing the ranked list back.
//! Remaining groups are resolved from inside the chosen directory.

mod group;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use group::{ChainScope, Offset, PatternGroup};

use crate::config::EngineConfig;
use crate::error::{NavdexError, Result};
use crate::index::{IndexStore, MatchCandidate, find_index, load_chain};
use crate::select::{Control, KeyReader, Menu, SelectionController, Signal};

/// Leading marker for output the shell wrapper should print, not `cd` into.
pub const MESSAGE_SENTINEL: &str = "!";
/// Leading marker for output the shell wrapper should run as a command.
pub const COMMAND_SENTINEL: &str = "!!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
	/// Prompt on the terminal when a pattern is ambiguous.
	#[default]
	Interactive,
	/// Return ambiguous matches as a printable list.
	ListOnly,
	/// Return ambiguous matches to the caller unselected.
	ComputeOnly,
}

/// Final state of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Resolved(PathBuf),
	/// Nothing matched; carries the patterns joined with `+`.
	NoMatches(String),
	/// Absolute paths to show the user.
	Listing(Vec<String>),
	/// Ranked matches, with absolute paths, left for the caller to choose.
	Pending(Vec<MatchCandidate>),
	/// The prompt was cancelled or quit.
	Aborted,
}

impl Resolution {
	/// The line printed for the shell wrapper, if any.
	pub fn shell_line(&self) -> Option<String> {
		match self {
			Resolution::Resolved(path) => Some(path.display().to_string()),
			Resolution::NoMatches(patterns) => {
				Some(format!("{MESSAGE_SENTINEL}No matches for pattern [{patterns}]"))
			}
			Resolution::Listing(lines) => Some(format!("{MESSAGE_SENTINEL}{}", lines.join("\n"))),
			Resolution::Pending(candidates) => {
				let lines: Vec<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
				Some(format!("{MESSAGE_SENTINEL}{}", lines.join("\n")))
			}
			Resolution::Aborted => None,
		}
	}

	pub fn exit_code(&self) -> u8 {
		match self {
			Resolution::Resolved(_) | Resolution::Listing(_) | Resolution::Pending(_) => 0,
			Resolution::NoMatches(_) => 1,
			Resolution::Aborted => 130,
		}
	}
}

/// Outcome of one pattern group.
enum Step {
	Chosen(PathBuf),
	Finished(Resolution),
}

/// Drives pattern groups through matching and selection.
pub struct Resolver<'a> {
	config: &'a EngineConfig,
	mode: ResolveMode,
	keys: &'a mut dyn KeyReader,
	out: &'a mut dyn Write,
	width: Option<usize>,
}

impl<'a> Resolver<'a> {
	/// `keys` and `out` are only touched in [`ResolveMode::Interactive`] and
	/// for offset warnings.
	pub fn new(
		config: &'a EngineConfig,
		mode: ResolveMode,
		keys: &'a mut dyn KeyReader,
		out: &'a mut dyn Write,
	) -> Self {
		Self {
			config,
			mode,
			keys,
			out,
			width: None,
		}
	}

	/// Terminal width used to truncate menu rows.
	pub fn with_width(mut self, width: Option<usize>) -> Self {
		self.width = width;
		self
	}

	pub fn resolve(&mut self, tokens: &[String]) -> Result<Resolution> {
		let joined = tokens.join("+");
		let mut rest = tokens;
		let mut here = self.config.cwd.clone();
		let mut depth = 0;

		while let Some(group) = PatternGroup::parse(rest) {
			depth += 1;
			if depth > self.config.max_depth {
				warn!(depth, patterns = %joined, "pattern nesting too deep");
				return Ok(Resolution::NoMatches(joined));
			}
			debug!(?group, here = %here.display(), "resolving pattern group");

			let chosen = match self.step(&group, &here, &joined)? {
				Step::Chosen(path) => path,
				Step::Finished(resolution) => return Ok(resolution),
			};

			rest = &rest[group.consumed..];
			if rest.is_empty() {
				info!(path = %chosen.display(), "resolved");
				return Ok(match self.mode {
					ResolveMode::ListOnly => Resolution::Listing(vec![chosen.display().to_string()]),
					_ => Resolution::Resolved(chosen),
				});
			}
			here = chosen;
		}

		Ok(Resolution::NoMatches(joined))
	}

	fn step(&mut self, group: &PatternGroup, start: &Path, joined: &str) -> Result<Step> {
		let mut relocations = vec![start.to_path_buf()];
		let mut attempts = 0;

		loop {
			attempts += 1;
			let here = match relocations.last() {
				Some(dir) => dir.clone(),
				None => start.to_path_buf(),
			};
			let config = self.config.clone().with_cwd(&here);

			let Some(store) = Self::scoped_store(&config, &here, group.scope)? else {
				return Ok(Step::Finished(Resolution::NoMatches(joined.to_string())));
			};
			if store.is_empty() {
				return Ok(Step::Finished(Resolution::NoMatches(joined.to_string())));
			}

			let mut matches: Vec<MatchCandidate> = Vec::new();
			for candidate in store.match_paths(&[group.glob()], &here, false)? {
				let path = store.abs_path(&candidate.path).to_string_lossy().into_owned();
				// Ranked order: the first spelling of a directory wins.
				if !matches.iter().any(|seen| seen.path == path) {
					matches.push(MatchCandidate::new(path, candidate.priority));
				}
			}
			if matches.is_empty() {
				return Ok(Step::Finished(Resolution::NoMatches(joined.to_string())));
			}

			if let Some(requested) = group.offset {
				let offset = Offset::clamp(requested, matches.len());
				if offset.clamped {
					let _ = writeln!(
						self.out,
						"Warning: Offset {requested} exceeds number of matches for pattern [{joined}]. Selecting index {} instead.",
						offset.index
					);
				}
				return Ok(Step::Chosen(PathBuf::from(&matches[offset.index].path)));
			}
			if matches.len() == 1 {
				return Ok(Step::Chosen(PathBuf::from(&matches[0].path)));
			}

			match self.mode {
				ResolveMode::ListOnly => return Ok(Step::Finished(listing(&matches))),
				ResolveMode::ComputeOnly => {
					return Ok(Step::Finished(Resolution::Pending(matches)));
				}
				ResolveMode::Interactive => {}
			}

			let signal = self.prompt(&matches, store.root(), &config)?;
			match signal {
				Signal::Selected(index) => {
					return Ok(Step::Chosen(PathBuf::from(&matches[index].path)));
				}
				Signal::Cancel | Signal::Control(Control::Quit) => {
					info!("selection aborted");
					return Ok(Step::Finished(Resolution::Aborted));
				}
				Signal::Control(Control::GoUp) => {
					let target = store.root().parent().map(Path::to_path_buf);
					let climbs = match &target {
						Some(target) if *target != here && attempts < self.config.max_depth => {
							self.reaches_other_index(target, store.path())?
						}
						_ => false,
					};
					match target {
						Some(target) if climbs => {
							info!(from = %here.display(), to = %target.display(), "moving up the index tree");
							relocations.push(target);
						}
						_ => {
							debug!(here = %here.display(), "cannot move up");
							return Ok(Step::Finished(listing(&matches)));
						}
					}
				}
				Signal::Control(Control::GoDown) => {
					if relocations.len() < 2 || attempts >= self.config.max_depth {
						debug!(here = %here.display(), "cannot move down");
						return Ok(Step::Finished(listing(&matches)));
					}
					relocations.pop();
					info!(from = %here.display(), "moving down the index tree");
				}
			}
		}
	}

	/// Whether the index governing `target` differs from `current`. Climbing
	/// into the same index again would only repeat the prompt.
	fn reaches_other_index(&self, target: &Path, current: &Path) -> Result<bool> {
		match find_index(&self.config.clone().with_cwd(target), target) {
			Ok(found) => Ok(found != current),
			Err(NavdexError::NoIndexFound { .. }) => Ok(false),
			Err(err) => Err(err),
		}
	}

	/// Load the chain for `here` and narrow it to `scope`. `None` when the
	/// scope leaves nothing to search.
	fn scoped_store(config: &EngineConfig, here: &Path, scope: ChainScope) -> Result<Option<IndexStore>> {
		let chain = load_chain(config, here, scope.is_deep())?;
		Ok(match scope {
			ChainScope::OuterOnly => chain.into_outer(),
			ChainScope::Nearest | ChainScope::Global => Some(chain),
		})
	}

	fn prompt(&mut self, matches: &[MatchCandidate], root: &Path, config: &EngineConfig) -> Result<Signal> {
		Menu::new(matches, root, config)
			.with_width(self.width)
			.draw(&mut *self.out)
			.map_err(NavdexError::Terminal)?;
		SelectionController::new(matches.len()).run(&mut *self.keys, &mut *self.out)
	}
}

fn listing(matches: &[MatchCandidate]) -> Resolution {
	Resolution::Listing(matches.iter().map(|c| c.path.clone()).collect())
}
