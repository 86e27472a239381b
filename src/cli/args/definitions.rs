use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser};

use super::options::OutputFormat;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `navdex` binary.
///
/// Without a management flag the positional tokens are patterns to resolve.
/// The result is printed on stdout for a shell function to `cd` into; lines
/// starting with `!` are messages and `!!` lines are commands to run.
#[derive(Parser, Debug)]
#[command(
	name = "navdex",
	version,
	long_version = long_version(),
	about = "Quick directory changer driven by per-tree bookmark indices",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		short = 'x',
		long = "ix-here",
		help = "Create an index in the current directory"
	)]
	pub(crate) create_index_here: bool,
	#[arg(
		short = 'r',
		long,
		help = "With --add-dir, also add every non-hidden directory below it"
	)]
	pub(crate) recurse: bool,
	#[arg(
		short = 'a',
		long = "add-dir",
		help = "Add a directory to the index (default: current directory)"
	)]
	pub(crate) add_dir: bool,
	#[arg(
		short = 'd',
		long = "del-dir",
		help = "Delete the current directory from the index"
	)]
	pub(crate) del_dir: bool,
	#[arg(short = 'c', long = "cleanup", help = "Drop entries whose directory is gone")]
	pub(crate) cleanup: bool,
	#[arg(
		short = 'q',
		long = "query",
		help = "Print information about the index chain"
	)]
	pub(crate) query: bool,
	#[arg(short = 'e', long = "edit", help = "Open the index in $EDITOR")]
	pub(crate) edit: bool,
	#[arg(
		short = 'p',
		long = "printonly",
		help = "Print the matches instead of prompting"
	)]
	pub(crate) print_only: bool,
	#[arg(
		long = "auto",
		visible_alias = "autoedit",
		help = "Edit the description file here, creating it first if missing"
	)]
	pub(crate) auto_edit: bool,
	#[arg(
		short = 'g',
		long = "grep",
		help = "Match indexed paths, tags and descriptions against a regular expression"
	)]
	pub(crate) grep: bool,
	#[arg(
		long,
		value_name = "N",
		value_parser = clap::value_parser!(u32).range(1..),
		help = "Priority for --add-dir; existing entries are left alone without it (default: 1 for new entries)"
	)]
	pub(crate) priority: Option<u32>,
	#[arg(
		long = "config",
		value_name = "FILE",
		env = "NAVDEX_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading the default configuration file (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		long = "print-config",
		help = "Print the resolved configuration to stderr before running"
	)]
	pub(crate) print_config: bool,
	#[arg(
		long = "fs-root",
		value_name = "PATH",
		help = "Stop the upward index search at this directory (default: /)"
	)]
	pub(crate) fs_root: Option<PathBuf>,
	#[arg(
		long = "all-owners",
		help = "Accept index files owned by other users"
	)]
	pub(crate) all_owners: bool,
	#[arg(
		long = "max-depth",
		value_name = "NUM",
		help = "Limit how many patterns are resolved in sequence (default: 16)"
	)]
	pub(crate) max_depth: Option<usize>,
	#[arg(
		long = "log-level",
		value_name = "LEVEL",
		help = "Log filter written to the log file (default: info)"
	)]
	pub(crate) log_level: Option<String>,
	#[arg(long = "no-color", help = "Render the selection menu without colour")]
	pub(crate) no_color: bool,
	#[arg(
		short = 'o',
		long = "output",
		value_enum,
		default_value_t = OutputFormat::Plain,
		help = "Choose how to print the result"
	)]
	pub(crate) output: OutputFormat,
	#[arg(
		value_name = "PATTERN",
		trailing_var_arg = true,
		allow_hyphen_values = true,
		help = "Patterns to resolve; each may be followed by '/', '//' or an offset N"
	)]
	pub(crate) patterns: Vec<String>,
}

impl CliArgs {
	/// Whether any index management flag was given.
	pub(crate) fn has_command(&self) -> bool {
		self.create_index_here || self.del_dir || self.query || self.cleanup
	}
}
