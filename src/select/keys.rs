use std::collections::VecDeque;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

use crate::error::{NavdexError, Result};

/// A single keystroke as seen by the selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
	Char(char),
	Enter,
	Backspace,
	Escape,
	/// Ctrl+C.
	Interrupt,
}

impl Key {
	/// Translate a terminal key event; keys the prompt has no use for map to
	/// `None`.
	pub fn from_event(key: KeyEvent) -> Option<Self> {
		if key.kind != KeyEventKind::Press {
			return None;
		}
		match key.code {
			KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
				Some(Key::Interrupt)
			}
			KeyCode::Char(ch) => Some(Key::Char(ch)),
			KeyCode::Enter => Some(Key::Enter),
			KeyCode::Backspace => Some(Key::Backspace),
			KeyCode::Esc => Some(Key::Escape),
			_ => None,
		}
	}
}

/// Source of keystrokes for interactive selection.
pub trait KeyReader {
	/// Block until the next keystroke arrives.
	fn read_key(&mut self) -> Result<Key>;

	/// Give back whatever the reader acquired to produce keys. Called when
	/// a prompt finishes, whether it succeeded, was cancelled or failed.
	fn release(&mut self) {}
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
	fn acquire() -> Result<Self> {
		enable_raw_mode().map_err(NavdexError::Terminal)?;
		debug!("terminal switched to raw mode");
		Ok(Self)
	}
}

impl Drop for RawModeGuard {
	fn drop(&mut self) {
		if let Err(err) = disable_raw_mode() {
			warn!(%err, "failed to restore terminal mode");
		} else {
			debug!("terminal mode restored");
		}
	}
}

/// Reads raw, unechoed keystrokes from the controlling terminal.
///
/// Raw mode is entered lazily on the first read and left again on
/// [`KeyReader::release`] or when the reader is dropped.
#[derive(Default)]
pub struct TerminalKeys {
	guard: Option<RawModeGuard>,
}

impl TerminalKeys {
	pub fn new() -> Self {
		Self::default()
	}
}

impl KeyReader for TerminalKeys {
	fn read_key(&mut self) -> Result<Key> {
		if self.guard.is_none() {
			self.guard = Some(RawModeGuard::acquire()?);
		}
		loop {
			match event::read().map_err(NavdexError::Terminal)? {
				Event::Key(key) => {
					if let Some(key) = Key::from_event(key) {
						return Ok(key);
					}
				}
				_ => continue,
			}
		}
	}

	fn release(&mut self) {
		self.guard = None;
	}
}

/// Replays a fixed sequence of keys; once exhausted every read yields
/// [`Key::Interrupt`] so a prompt can never block forever.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
	keys: VecDeque<Key>,
	released: usize,
}

impl ScriptedKeys {
	pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
		Self {
			keys: keys.into_iter().collect(),
			released: 0,
		}
	}

	/// Script typing `text`, one [`Key::Char`] per character.
	pub fn typing(text: &str) -> Self {
		Self::new(text.chars().map(Key::Char))
	}

	pub fn remaining(&self) -> usize {
		self.keys.len()
	}

	/// How many times [`KeyReader::release`] has been called.
	pub fn releases(&self) -> usize {
		self.released
	}
}

impl KeyReader for ScriptedKeys {
	fn read_key(&mut self) -> Result<Key> {
		Ok(self.keys.pop_front().unwrap_or(Key::Interrupt))
	}

	fn release(&mut self) {
		self.released += 1;
	}
}
