//! Directory tree building
//!
//! This module turns a root directory into a flat, index-addressed [`Tree`]:
//!
//! - `ignore_context`: per-level `.gitignore` aggregation
//! - `enumerator`: filtered, ordered, capped listing of one directory
//! - `builder`: depth-first recursion producing the tree and its index maps

mod builder;
mod config;
mod enumerator;
mod ignore_context;
mod node;
mod utils;

pub use builder::TreeBuilder;
pub use config::{EntryOrder, MAX_CAP, TreeConfig};
pub use enumerator::{DirectoryEnumerator, Entry, Listing};
pub use ignore_context::{IGNORE_FILE_NAME, IgnoreAggregator, IgnoreContext};
pub use node::{NodeKind, ROOT_MARKER, Tree, TreeNode};
pub use utils::{display_name, matches_file_type, relative_posix};
