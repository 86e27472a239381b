mod cli;
mod settings;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use cli::{CliArgs, Outcome, emit, parse_cli};
use navdex::{EngineConfig, ResolveMode, Resolver, TerminalKeys, commands, logging};
use tracing::{error, info};

fn main() -> ExitCode {
	let cli = parse_cli();
	match run(&cli) {
		Ok(code) => ExitCode::from(code),
		Err(err) => {
			error!("{err:#}");
			eprintln!("navdex: {err:#}");
			ExitCode::FAILURE
		}
	}
}

/// Dispatch to the requested command and return the process exit status.
fn run(cli: &CliArgs) -> Result<u8> {
	let resolved = settings::load(cli)?;
	logging::initialize(&resolved.log);
	info!(cwd = %resolved.engine.cwd.display(), patterns = ?cli.patterns, "navdex started");

	if cli.print_config {
		resolved.print_summary();
	}

	let config = &resolved.engine;
	if let Some(path) = commands::ensure_home_index(config)? {
		eprintln!("navdex first-time initialization: created {}", path.display());
	}

	if cli.grep {
		let report = commands::grep(config, cli.patterns.first().map(String::as_str))?;
		return finish(cli, Outcome::Report(report));
	}
	if cli.auto_edit {
		return finish(cli, Outcome::Report(commands::edit_auto_here(config)?));
	}
	if cli.add_dir {
		let dir = cli.patterns.first().map(Path::new);
		let report = commands::add_dirs(config, dir, cli.priority, cli.recurse)?;
		return finish(cli, Outcome::Report(report));
	}
	if cli.edit {
		return finish(cli, Outcome::Report(commands::edit_index(config)?));
	}

	let mut status = 0;
	for report in management_reports(cli, config)? {
		status = status.max(finish(cli, Outcome::Report(report))?);
	}

	if cli.patterns.is_empty() {
		if cli.has_command() {
			return Ok(status);
		}
		eprintln!("No search patterns specified, try --help");
		return Ok(1);
	}

	let mode = if cli.print_only {
		ResolveMode::ListOnly
	} else {
		ResolveMode::Interactive
	};
	let mut keys = TerminalKeys::new();
	let mut menu = io::stderr();
	let resolution = Resolver::new(config, mode, &mut keys, &mut menu)
		.with_width(settings::terminal_width())
		.resolve(&cli.patterns)?;
	finish(cli, Outcome::Resolution(resolution))
}

/// Run the flag-driven index commands in their fixed order.
fn management_reports(cli: &CliArgs, config: &EngineConfig) -> Result<Vec<commands::Report>> {
	let mut reports = Vec::new();
	if cli.create_index_here {
		reports.push(commands::create_index_here(config)?);
	}
	if cli.del_dir {
		reports.push(commands::del_dir(config)?);
	}
	if cli.query {
		reports.push(commands::index_info(config)?);
	}
	if cli.cleanup {
		reports.push(commands::clean_index(config)?);
	}
	Ok(reports)
}

fn finish(cli: &CliArgs, outcome: Outcome) -> Result<u8> {
	emit(cli.output, &outcome)?;
	Ok(outcome.exit_code())
}
