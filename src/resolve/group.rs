use tracing::warn;

const OUTER_ONLY_MARKER: &str = "/";
const GLOBAL_MARKER: &str = "//";

/// How much of the index chain a pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainScope {
	/// Only the nearest index.
	#[default]
	Nearest,
	/// Every enclosing index, skipping the nearest one.
	OuterOnly,
	/// The nearest index and every enclosing one.
	Global,
}

impl ChainScope {
	fn from_marker(token: &str) -> Option<Self> {
		match token {
			OUTER_ONLY_MARKER => Some(Self::OuterOnly),
			GLOBAL_MARKER => Some(Self::Global),
			_ => None,
		}
	}

	/// Whether enclosing stores need to be loaded at all.
	pub fn is_deep(self) -> bool {
		self != Self::Nearest
	}
}

/// One pattern and the modifier tokens that directly follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
	pub pattern: String,
	pub scope: ChainScope,
	/// Pick the Nth ranked match instead of prompting; negative counts from
	/// the end.
	pub offset: Option<i64>,
	/// Tokens taken from the input, the pattern included.
	pub consumed: usize,
}

impl PatternGroup {
	/// Take the next group off `tokens`.
	///
	/// Up to two tokens after the pattern are inspected; each may be a
	/// scope marker (`/` or `//`) or an integer offset. The scan stops at
	/// the first token that is neither, or that repeats a kind already
	/// seen, and that token starts the next group.
	pub fn parse(tokens: &[String]) -> Option<Self> {
		let (pattern, rest) = tokens.split_first()?;
		let mut group = Self {
			pattern: pattern.clone(),
			scope: ChainScope::Nearest,
			offset: None,
			consumed: 1,
		};

		let mut scope_seen = false;
		for token in rest.iter().take(2) {
			if !scope_seen && let Some(scope) = ChainScope::from_marker(token) {
				group.scope = scope;
				scope_seen = true;
			} else if group.offset.is_none()
				&& let Ok(offset) = token.parse::<i64>()
			{
				group.offset = Some(offset);
			} else {
				break;
			}
			group.consumed += 1;
		}
		Some(group)
	}

	/// The glob actually matched: the pattern anywhere inside a segment.
	pub fn glob(&self) -> String {
		format!("*{}*", self.pattern)
	}
}

/// A requested offset mapped onto a list of `len` matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
	pub index: usize,
	/// The request was out of range and has been pulled to the nearest end.
	pub clamped: bool,
}

impl Offset {
	/// Map `requested` onto `0..len`. Negative offsets count from the end;
	/// anything out of range is clamped with a warning. `len` must be
	/// non-zero.
	pub fn clamp(requested: i64, len: usize) -> Self {
		let last = len.saturating_sub(1);
		let signed_len = i64::try_from(len).unwrap_or(i64::MAX);

		let (index, clamped) = if requested >= signed_len {
			(last, true)
		} else if requested >= 0 {
			(requested as usize, false)
		} else if requested >= -signed_len {
			((signed_len + requested) as usize, false)
		} else {
			(0, true)
		};

		if clamped {
			warn!(requested, matches = len, selected = index, "offset out of range");
		}
		Self { index, clamped }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn bare_pattern_is_one_group() {
		let group = PatternGroup::parse(&tokens(&["client1", "site"])).unwrap();
		assert_eq!(group.pattern, "client1");
		assert_eq!(group.scope, ChainScope::Nearest);
		assert_eq!(group.offset, None);
		assert_eq!(group.consumed, 1);
		assert_eq!(group.glob(), "*client1*");
	}

	#[test]
	fn modifiers_in_either_order() {
		let group = PatternGroup::parse(&tokens(&["proj", "//", "2", "next"])).unwrap();
		assert_eq!(group.scope, ChainScope::Global);
		assert_eq!(group.offset, Some(2));
		assert_eq!(group.consumed, 3);

		let group = PatternGroup::parse(&tokens(&["proj", "-1", "/"])).unwrap();
		assert_eq!(group.scope, ChainScope::OuterOnly);
		assert_eq!(group.offset, Some(-1));
		assert_eq!(group.consumed, 3);
	}

	#[test]
	fn scan_stops_at_the_next_pattern() {
		let group = PatternGroup::parse(&tokens(&["a", "b", "3"])).unwrap();
		assert_eq!(group.consumed, 1);
		assert_eq!(group.offset, None);
	}

	#[test]
	fn repeated_modifier_starts_a_new_group() {
		let group = PatternGroup::parse(&tokens(&["a", "1", "2"])).unwrap();
		assert_eq!(group.offset, Some(1));
		assert_eq!(group.consumed, 2);
	}

	#[test]
	fn empty_input_has_no_group() {
		assert!(PatternGroup::parse(&[]).is_none());
	}

	#[test]
	fn offsets_clamp_to_the_nearest_end() {
		assert_eq!(Offset::clamp(1, 3), Offset { index: 1, clamped: false });
		assert_eq!(Offset::clamp(-1, 3), Offset { index: 2, clamped: false });
		assert_eq!(Offset::clamp(-3, 3), Offset { index: 0, clamped: false });
		assert_eq!(Offset::clamp(3, 3), Offset { index: 2, clamped: true });
		assert_eq!(Offset::clamp(-4, 3), Offset { index: 0, clamped: true });
	}
}
