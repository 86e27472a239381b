//! Configuration loading and resolution utilities.
//!
//! Settings are layered from the default config file, `--config` files,
//! `NAVDEX__SECTION__KEY` environment variables and finally CLI flags.
//! `load` is the entry point and returns a [`ResolvedConfig`] carrying the
//! engine configuration and logging preferences.

mod loader;
mod raw;
mod resolved;
mod sources;
mod util;

pub use loader::load;
pub use resolved::ResolvedConfig;
pub(crate) use util::terminal_width;
