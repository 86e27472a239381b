//! Index files and the chain of stores built from them.
//!
//! An index is a flat text file listing bookmarked directories relative to
//! the directory that holds it, one `<path> <priority>` pair per line. The
//! store for the nearest index may link to the store of an enclosing tree,
//! forming a chain that ends at the home index.

mod auto;
mod locate;
mod matcher;
mod store;

pub use auto::{AUTO_TEMPLATE, AutoContent};
pub use locate::{find_index, load_chain};
pub use matcher::{MatchCandidate, rank};
pub use store::{AddOutcome, CleanReport, IndexEntry, IndexStore, PROTECT_MARKER};
