//! Core crate exports for the `navdex` directory jumper.
//!
//! The engine locates the index files governing a directory, matches glob
//! patterns against the bookmarked paths and narrows ambiguous matches down
//! through a keystroke-driven prompt. The binary is a thin layer printing
//! the result for a shell wrapper to act on.

pub mod app_dirs;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod paths;
pub mod resolve;
pub mod select;

pub use config::EngineConfig;
pub use error::{NavdexError, Result};
pub use index::{IndexEntry, IndexStore, MatchCandidate, find_index, load_chain};
pub use resolve::{ResolveMode, Resolution, Resolver};
pub use select::{KeyReader, ScriptedKeys, SelectionController, TerminalKeys};
