use std::io::{self, Write};

use super::ResolvedConfig;

pub(super) fn write_summary(config: &ResolvedConfig, out: &mut impl Write) -> io::Result<()> {
	let engine = &config.engine;
	writeln!(out, "Effective configuration:")?;
	writeln!(out, "  Home: {}", engine.home.display())?;
	writeln!(out, "  Working directory: {}", engine.cwd.display())?;
	writeln!(out, "  Filesystem root: {}", engine.fs_root.display())?;
	writeln!(out, "  Index file: {}", engine.index_file_name)?;
	writeln!(out, "  Description file: {}", engine.auto_file_name)?;
	writeln!(out, "  Only my indices: {}", bool_to_word(engine.only_mine))?;
	writeln!(out, "  Max ascent: {}", engine.max_ascent)?;
	writeln!(out, "  Max pattern depth: {}", engine.max_depth)?;
	writeln!(out, "  Colour: {}", bool_to_word(engine.color))?;
	if config.log.enabled {
		writeln!(out, "  Log level: {}", config.log.level)?;
		if let Some(file) = &config.log.file {
			writeln!(out, "  Log file: {}", file.display())?;
		}
	} else {
		writeln!(out, "  Logging: disabled")?;
	}
	Ok(())
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
