//! Keystroke-driven disambiguation of a ranked candidate list.
//!
//! Candidates are addressed by their position ("0", "1", ...). Digits are
//! committed as soon as they identify exactly one candidate, so a short list
//! never needs Enter. A few reserved keys leave the prompt with a control
//! signal instead of a selection.

mod keys;
mod menu;

use std::io::Write;

use tracing::{debug, info, warn};

pub use keys::{Key, KeyReader, ScriptedKeys, TerminalKeys};
pub use menu::Menu;

use crate::error::{NavdexError, Result};

/// Non-selection actions reachable from the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
	Quit,
	/// Retry the search from the index above the current one.
	GoUp,
	/// Return to the index the last [`Control::GoUp`] left.
	GoDown,
}

impl Control {
	pub fn label(self) -> &'static str {
		match self {
			Control::Quit => "<Quit>",
			Control::GoUp => "<Up Tree>",
			Control::GoDown => "<Down Tree>",
		}
	}
}

/// Reserved selector keys, in display order.
pub const CONTROL_KEYS: [(&str, Control); 3] = [
	("q", Control::Quit),
	("\\", Control::GoUp),
	("/", Control::GoDown),
];

/// How a prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
	Selected(usize),
	/// Ctrl+C.
	Cancel,
	Control(Control),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
	Candidate(usize),
	Control(Control),
}

/// State machine turning keystrokes into a [`Signal`].
#[derive(Debug, Clone)]
pub struct SelectionController {
	selectors: Vec<(String, Target)>,
	buffer: String,
}

impl SelectionController {
	/// Controller for `count` ranked candidates. The buffer starts at "0" so
	/// that Enter alone picks the top match.
	pub fn new(count: usize) -> Self {
		let mut selectors: Vec<(String, Target)> = (0..count)
			.map(|index| (index.to_string(), Target::Candidate(index)))
			.collect();
		selectors.extend(
			CONTROL_KEYS
				.iter()
				.map(|(key, control)| (key.to_string(), Target::Control(*control))),
		);

		Self {
			selectors,
			buffer: "0".to_string(),
		}
	}

	pub fn buffer(&self) -> &str {
		&self.buffer
	}

	/// Selector keys with what they stand for, in display order.
	pub fn selector_keys(&self) -> impl Iterator<Item = (&str, Option<Control>)> {
		self.selectors.iter().map(|(key, target)| {
			let control = match target {
				Target::Candidate(_) => None,
				Target::Control(control) => Some(*control),
			};
			(key.as_str(), control)
		})
	}

	/// Apply one keystroke. `None` means keep waiting.
	pub fn feed(&mut self, key: Key) -> Option<Signal> {
		match key {
			Key::Interrupt => Some(Signal::Cancel),
			Key::Backspace => {
				self.buffer.pop();
				None
			}
			Key::Escape => {
				self.buffer.clear();
				None
			}
			Key::Enter => self.commit(),
			Key::Char(ch) => self.push(ch),
		}
	}

	fn commit(&mut self) -> Option<Signal> {
		if self.buffer.is_empty() {
			return None;
		}
		match self.lookup(&self.buffer) {
			Some(Target::Candidate(index)) => Some(Signal::Selected(index)),
			Some(Target::Control(control)) => Some(Signal::Control(control)),
			None => {
				self.buffer.clear();
				None
			}
		}
	}

	fn push(&mut self, ch: char) -> Option<Signal> {
		if self.buffer == "0" {
			if ch == '0' && self.numeric_count() > 0 {
				return Some(Signal::Selected(0));
			}
			self.buffer.clear();
		}
		self.buffer.push(ch);

		let prefixed = self
			.selectors
			.iter()
			.filter(|(key, target)| {
				matches!(target, Target::Candidate(_)) && key.starts_with(self.buffer.as_str())
			})
			.count();
		if prefixed > 1 {
			debug!(buffer = %self.buffer, candidates = prefixed, "ambiguous prefix");
			return None;
		}

		match self.lookup(&self.buffer) {
			Some(Target::Candidate(index)) => Some(Signal::Selected(index)),
			Some(Target::Control(control)) => Some(Signal::Control(control)),
			None => {
				debug!(buffer = %self.buffer, "input matches nothing");
				self.buffer.clear();
				None
			}
		}
	}

	fn lookup(&self, key: &str) -> Option<Target> {
		self.selectors
			.iter()
			.find(|(selector, _)| selector == key)
			.map(|(_, target)| *target)
	}

	fn numeric_count(&self) -> usize {
		self.selectors
			.iter()
			.filter(|(_, target)| matches!(target, Target::Candidate(_)))
			.count()
	}

	/// Prompt on `out` and consume keys until a signal is produced. The
	/// reader is released on every exit path.
	pub fn run<K, W>(&mut self, keys: &mut K, out: &mut W) -> Result<Signal>
	where
		K: KeyReader + ?Sized,
		W: Write + ?Sized,
	{
		let outcome = self.prompt_loop(keys, out);
		keys.release();
		if let Err(err) = writeln!(out) {
			warn!(%err, "failed to finish the prompt line");
		}
		if let Ok(signal) = &outcome {
			info!(?signal, "selection prompt finished");
		}
		outcome
	}

	fn prompt_loop<K, W>(&mut self, keys: &mut K, out: &mut W) -> Result<Signal>
	where
		K: KeyReader + ?Sized,
		W: Write + ?Sized,
	{
		loop {
			menu::draw_prompt(out, &self.buffer).map_err(NavdexError::Terminal)?;
			let key = keys.read_key()?;
			debug!(?key, "prompt keystroke");
			if let Some(signal) = self.feed(key) {
				return Ok(signal);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn feed_all(controller: &mut SelectionController, text: &str) -> Option<Signal> {
		let mut last = None;
		for ch in text.chars() {
			last = controller.feed(Key::Char(ch));
			if last.is_some() {
				break;
			}
		}
		last
	}

	#[test]
	fn single_digit_commits_without_enter() {
		let mut controller = SelectionController::new(3);
		assert_eq!(controller.feed(Key::Char('2')), Some(Signal::Selected(2)));
	}

	#[test]
	fn shared_prefix_waits_for_more_digits() {
		let mut controller = SelectionController::new(12);
		assert_eq!(controller.feed(Key::Char('1')), None);
		assert_eq!(controller.buffer(), "1");
		assert_eq!(controller.feed(Key::Char('0')), Some(Signal::Selected(10)));
	}

	#[test]
	fn enter_commits_an_ambiguous_prefix() {
		let mut controller = SelectionController::new(12);
		assert_eq!(controller.feed(Key::Char('1')), None);
		assert_eq!(controller.feed(Key::Enter), Some(Signal::Selected(1)));
	}

	#[test]
	fn enter_alone_picks_the_top_match() {
		let mut controller = SelectionController::new(5);
		assert_eq!(controller.feed(Key::Enter), Some(Signal::Selected(0)));
	}

	#[test]
	fn double_zero_commits_zero() {
		let mut controller = SelectionController::new(15);
		assert_eq!(feed_all(&mut controller, "00"), Some(Signal::Selected(0)));
	}

	#[test]
	fn empty_buffer_enter_is_a_no_op() {
		let mut controller = SelectionController::new(5);
		assert_eq!(controller.feed(Key::Escape), None);
		assert_eq!(controller.buffer(), "");
		assert_eq!(controller.feed(Key::Enter), None);
	}

	#[test]
	fn backspace_edits_the_buffer() {
		let mut controller = SelectionController::new(20);
		assert_eq!(controller.feed(Key::Char('1')), None);
		assert_eq!(controller.feed(Key::Backspace), None);
		assert_eq!(controller.buffer(), "");
		assert_eq!(controller.feed(Key::Backspace), None);
		assert_eq!(controller.feed(Key::Char('4')), Some(Signal::Selected(4)));
	}

	#[test]
	fn unknown_input_resets_the_buffer() {
		let mut controller = SelectionController::new(3);
		assert_eq!(controller.feed(Key::Char('7')), None);
		assert_eq!(controller.buffer(), "");
		assert_eq!(controller.feed(Key::Char('x')), None);
		assert_eq!(controller.feed(Key::Char('1')), Some(Signal::Selected(1)));
	}

	#[test]
	fn reserved_keys_raise_controls() {
		let mut controller = SelectionController::new(3);
		assert_eq!(
			controller.feed(Key::Char('q')),
			Some(Signal::Control(Control::Quit))
		);
		let mut controller = SelectionController::new(3);
		assert_eq!(
			controller.feed(Key::Char('\\')),
			Some(Signal::Control(Control::GoUp))
		);
		let mut controller = SelectionController::new(3);
		assert_eq!(
			controller.feed(Key::Char('/')),
			Some(Signal::Control(Control::GoDown))
		);
	}

	#[test]
	fn interrupt_cancels_immediately() {
		let mut controller = SelectionController::new(12);
		controller.feed(Key::Char('1'));
		assert_eq!(controller.feed(Key::Interrupt), Some(Signal::Cancel));
	}

	#[test]
	fn run_releases_the_reader_and_reports_selection() {
		let mut controller = SelectionController::new(11);
		let mut keys = ScriptedKeys::new([Key::Char('1'), Key::Char('0')]);
		let mut out = Vec::new();
		let signal = controller.run(&mut keys, &mut out).unwrap();
		assert_eq!(signal, Signal::Selected(10));
		assert_eq!(keys.releases(), 1);
		assert!(!out.is_empty());
	}

	#[test]
	fn exhausted_script_cancels() {
		let mut controller = SelectionController::new(11);
		let mut keys = ScriptedKeys::typing("1");
		let mut out = Vec::new();
		assert_eq!(controller.run(&mut keys, &mut out).unwrap(), Signal::Cancel);
		assert_eq!(keys.releases(), 1);
	}

	#[test]
	fn selector_keys_list_candidates_then_controls() {
		let controller = SelectionController::new(2);
		let keys: Vec<_> = controller.selector_keys().collect();
		assert_eq!(
			keys,
			vec![
				("0", None),
				("1", None),
				("q", Some(Control::Quit)),
				("\\", Some(Control::GoUp)),
				("/", Some(Control::GoDown)),
			]
		);
	}
}
