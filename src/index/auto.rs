use std::fs;
use std::path::Path;

use crate::error::{NavdexError, Result};

const TAGS_MARKER: &str = "# .TAGS:";
const DESC_MARKER: &str = "# .DESC:";

/// Starting content for a freshly created description file.
pub const AUTO_TEMPLATE: &str = "# navdex description file, read by `navdex --grep`.
# Only the first .TAGS and .DESC lines are honoured.
# .TAGS:
# .DESC:
";

/// Tags and description read from a directory's description file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoContent {
	tags: Vec<String>,
	desc: Option<String>,
}

impl AutoContent {
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|err| NavdexError::io(path, err))?;
		Ok(Self::parse(&text))
	}

	pub fn parse(text: &str) -> Self {
		let mut tags = None;
		let mut desc = None;
		for line in text.lines() {
			if tags.is_none()
				&& let Some(rest) = line.strip_prefix(TAGS_MARKER)
			{
				tags = Some(rest.split_whitespace().map(str::to_string).collect());
			} else if desc.is_none()
				&& let Some(rest) = line.strip_prefix(DESC_MARKER)
			{
				desc = Some(rest.trim_end().to_string());
			}
		}

		Self {
			tags: tags.unwrap_or_default(),
			desc,
		}
	}

	pub fn tags(&self) -> &[String] {
		&self.tags
	}

	/// Text after the marker, trailing whitespace removed. Empty when absent.
	pub fn desc(&self) -> &str {
		self.desc.as_deref().unwrap_or("")
	}
}
