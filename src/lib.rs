//! Gitree - a directory tree that respects .gitignore
//!
//! One filtered, depth-bounded tree per root feeds three consumers: the text
//! renderer, the archiver, and the interactive selector.

pub mod archive;
pub mod config;
pub mod error;
pub mod output;
pub mod pattern;
pub mod picker;
pub mod roots;
pub mod selection;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::{ArchiveEntry, ArchivePlan, ArchiveSink, DirectorySink};
pub use config::FileConfig;
pub use error::{Error, Result};
pub use output::{JsonRoot, OutputConfig, TreeFormatter, output_path, print_json};
pub use pattern::{Pattern, PatternSet};
pub use roots::{Root, resolve_roots};
pub use selection::{SelectionAction, SelectionController, SelectionOutcome};
pub use tree::{
    EntryOrder, IgnoreAggregator, IgnoreContext, NodeKind, Tree, TreeBuilder, TreeConfig,
    TreeNode,
};
