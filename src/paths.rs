//! Small path helpers shared by index loading and menu rendering.

use std::path::{MAIN_SEPARATOR, Path};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shorten `path` for display.
///
/// Relative paths are first anchored at `cwd`. Paths under `index_root` are
/// shown relative to it, paths under `home` get a `~` prefix, and anything
/// else stays absolute.
pub fn abbreviate(path: &Path, index_root: &Path, home: &Path, cwd: &Path) -> String {
	let absolute = if path.is_absolute() {
		path.to_path_buf()
	} else {
		cwd.join(path)
	};

	if let Ok(rel) = absolute.strip_prefix(index_root)
		&& rel.components().next().is_some()
	{
		return rel.display().to_string();
	}

	if let Ok(rel) = absolute.strip_prefix(home) {
		if rel.components().next().is_none() {
			return "~".to_string();
		}
		return format!("~{}{}", MAIN_SEPARATOR, rel.display());
	}

	absolute.display().to_string()
}

/// Keep the tail of `text` so that it fits in `max_width` terminal columns.
pub fn truncate_left(text: &str, max_width: usize) -> String {
	if text.width() <= max_width {
		return text.to_string();
	}
	if max_width == 0 {
		return String::new();
	}

	let budget = max_width - 1;
	let mut width = 0;
	let mut tail = Vec::new();
	for ch in text.chars().rev() {
		let w = ch.width().unwrap_or(0);
		if width + w > budget {
			break;
		}
		width += w;
		tail.push(ch);
	}
	let mut out = String::from("…");
	out.extend(tail.into_iter().rev());
	out
}
