use std::io::{self, Write};
use std::path::Path;

use ratatui::crossterm::QueueableCommand;
use ratatui::crossterm::cursor::MoveToColumn;
use ratatui::crossterm::style::{Print, Stylize};
use ratatui::crossterm::terminal::{Clear, ClearType};

use super::CONTROL_KEYS;
use crate::config::EngineConfig;
use crate::index::MatchCandidate;
use crate::paths::{abbreviate, truncate_left};

const PROMPT: &str = "Select: ";

/// Renders a ranked candidate list with its selector keys.
#[derive(Debug, Clone)]
pub struct Menu<'a> {
	candidates: &'a [MatchCandidate],
	index_root: &'a Path,
	home: &'a Path,
	cwd: &'a Path,
	color: bool,
	width: Option<usize>,
}

impl<'a> Menu<'a> {
	pub fn new(candidates: &'a [MatchCandidate], index_root: &'a Path, config: &'a EngineConfig) -> Self {
		Self {
			candidates,
			index_root,
			home: &config.home,
			cwd: &config.cwd,
			color: config.color,
			width: None,
		}
	}

	/// Truncate paths from the left so each row fits in `width` columns.
	pub fn with_width(mut self, width: Option<usize>) -> Self {
		self.width = width;
		self
	}

	/// Display form of every candidate, in rank order.
	pub fn lines(&self) -> Vec<String> {
		self.candidates
			.iter()
			.map(|candidate| abbreviate(Path::new(&candidate.path), self.index_root, self.home, self.cwd))
			.collect()
	}

	pub fn draw<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
		let key_width = self.candidates.len().saturating_sub(1).to_string().len();
		for (index, line) in self.lines().into_iter().enumerate() {
			let key = format!("{index:>key_width$}");
			let line = match self.width {
				Some(width) => truncate_left(&line, width.saturating_sub(key_width + 2)),
				None => line,
			};
			if self.color {
				write!(out, "{}: {}\r\n", key.yellow().bold(), line)?;
			} else {
				write!(out, "{key}: {line}\r\n")?;
			}
		}

		let controls: Vec<String> = CONTROL_KEYS
			.iter()
			.map(|(key, control)| format!("{key}:{}", control.label()))
			.collect();
		let controls = controls.join("   ");
		if self.color {
			write!(out, "{}\r\n", controls.dark_grey())?;
		} else {
			write!(out, "{controls}\r\n")?;
		}
		out.flush()
	}
}

/// Redraw the input line in place.
pub(super) fn draw_prompt<W: Write + ?Sized>(out: &mut W, buffer: &str) -> io::Result<()> {
	out.queue(MoveToColumn(0))?
		.queue(Clear(ClearType::CurrentLine))?
		.queue(Print(PROMPT))?
		.queue(Print(buffer))?;
	out.flush()
}
