use std::io::{self, Write};

use anyhow::Result;
use navdex::Resolution;
use navdex::commands::Report;
use serde_json::{Value, json};

use super::OutputFormat;

/// Anything the binary prints as its result.
#[derive(Debug)]
pub(crate) enum Outcome {
	Resolution(Resolution),
	Report(Report),
}

impl Outcome {
	pub(crate) fn exit_code(&self) -> u8 {
		match self {
			Outcome::Resolution(resolution) => resolution.exit_code(),
			Outcome::Report(report) => report.exit_code(),
		}
	}
}

/// Print `outcome` in the chosen format: results on stdout, notes on stderr.
pub(crate) fn emit(format: OutputFormat, outcome: &Outcome) -> Result<()> {
	let stdout = io::stdout();
	let stderr = io::stderr();
	match format {
		OutputFormat::Plain => write_plain(outcome, &mut stdout.lock(), &mut stderr.lock())?,
		OutputFormat::Json => writeln!(stdout.lock(), "{}", format_outcome_json(outcome)?)?,
	}
	Ok(())
}

fn write_plain(outcome: &Outcome, out: &mut impl Write, notes: &mut impl Write) -> io::Result<()> {
	match outcome {
		Outcome::Resolution(resolution) => {
			if let Some(line) = resolution.shell_line() {
				writeln!(out, "{line}")?;
			}
		}
		Outcome::Report(report) => {
			for note in &report.notes {
				writeln!(notes, "{note}")?;
			}
			if let Some(line) = &report.shell {
				writeln!(out, "{line}")?;
			}
		}
	}
	Ok(())
}

/// Format the outcome as a JSON string.
pub(crate) fn format_outcome_json(outcome: &Outcome) -> Result<String> {
	let payload = match outcome {
		Outcome::Resolution(resolution) => resolution_json(resolution),
		Outcome::Report(report) => json!({
			"kind": "command",
			"success": report.success,
			"notes": report.notes,
			"message": report.shell,
		}),
	};
	Ok(serde_json::to_string_pretty(&payload)?)
}

fn resolution_json(resolution: &Resolution) -> Value {
	match resolution {
		Resolution::Resolved(path) => json!({
			"kind": "resolved",
			"path": path.display().to_string(),
		}),
		Resolution::NoMatches(_) => json!({
			"kind": "no_matches",
			"message": resolution.shell_line(),
		}),
		Resolution::Listing(paths) => json!({
			"kind": "listing",
			"candidates": paths,
		}),
		Resolution::Pending(candidates) => json!({
			"kind": "pending",
			"candidates": candidates
				.iter()
				.map(|candidate| json!({ "path": candidate.path, "priority": candidate.priority }))
				.collect::<Vec<_>>(),
		}),
		Resolution::Aborted => json!({ "kind": "aborted" }),
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use super::*;

	#[test]
	fn json_format_includes_resolved_path() {
		let outcome = Outcome::Resolution(Resolution::Resolved(PathBuf::from("/srv/www")));
		let json = format_outcome_json(&outcome).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["kind"], "resolved");
		assert_eq!(value["path"], "/srv/www");
	}

	#[test]
	fn json_listing_carries_candidates() {
		let outcome = Outcome::Resolution(Resolution::Listing(vec!["/a".into(), "/b".into()]));
		let value: Value = serde_json::from_str(&format_outcome_json(&outcome).unwrap()).unwrap();
		assert_eq!(value["candidates"][1], "/b");
	}

	#[test]
	fn plain_report_splits_notes_from_shell_line() {
		let report = Report {
			notes: vec!["Index has been created in /tmp".into()],
			shell: Some("!!$EDITOR /tmp/.navdex-index".into()),
			success: true,
		};
		let mut out = Vec::new();
		let mut notes = Vec::new();
		write_plain(&Outcome::Report(report), &mut out, &mut notes).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "!!$EDITOR /tmp/.navdex-index\n");
		assert_eq!(String::from_utf8(notes).unwrap(), "Index has been created in /tmp\n");
	}

	#[test]
	fn aborted_prints_nothing_and_exits_130() {
		let outcome = Outcome::Resolution(Resolution::Aborted);
		let mut out = Vec::new();
		let mut notes = Vec::new();
		write_plain(&outcome, &mut out, &mut notes).unwrap();
		assert!(out.is_empty());
		assert_eq!(outcome.exit_code(), 130);
	}
}
