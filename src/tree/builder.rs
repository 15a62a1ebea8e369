//! TreeBuilder - builds the flat tree for one root
//!
//! The same tree feeds the text renderer, the archiver, and the interactive
//! selector; nothing here depends on which of them will consume it.

use std::path::Path;

use crate::error::{Error, Result};
use crate::pattern::PatternSet;

use super::config::TreeConfig;
use super::enumerator::DirectoryEnumerator;
use super::ignore_context::{IgnoreAggregator, IgnoreContext};
use super::node::Tree;

/// Builds depth-first, index-addressed trees.
pub struct TreeBuilder {
    config: TreeConfig,
    excludes: PatternSet,
    includes: PatternSet,
}

/// Mutable state for one root's traversal.
struct BuildState<'a> {
    tree: Tree,
    enumerator: DirectoryEnumerator<'a>,
    aggregator: IgnoreAggregator,
    /// Remaining `max_entries` budget.
    remaining: Option<usize>,
}

impl TreeBuilder {
    pub fn new(config: TreeConfig) -> Self {
        let excludes = PatternSet::compile(&config.extra_excludes);
        let includes = PatternSet::compile(&config.include_patterns);
        Self {
            config,
            excludes,
            includes,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Build the tree rooted at `root`.
    ///
    /// Fails only if `root` is not an existing directory; problems below the
    /// root are logged and the affected directory is treated as empty.
    pub fn build(&self, root: &Path) -> Result<Tree> {
        if !root.exists() {
            return Err(Error::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let aggregator = IgnoreAggregator::new(
            root,
            self.config.respect_gitignore,
            self.config.gitignore_depth,
        );
        let mut state = BuildState {
            tree: Tree::with_root(),
            enumerator: DirectoryEnumerator::new(
                root,
                &self.config,
                &self.excludes,
                &self.includes,
            ),
            remaining: self.config.max_entries,
            aggregator,
        };

        if !self.at_max_depth(0) {
            let context = state.aggregator.root_context();
            self.visit(&mut state, 0, root, 0, &context);
        }

        tracing::debug!("built tree for {} with {} nodes", root.display(), state.tree.len());
        Ok(state.tree)
    }

    /// Check if directories at `depth` should be listed but not expanded
    fn at_max_depth(&self, depth: usize) -> bool {
        self.config.max_depth.is_some_and(|max| depth >= max)
    }

    fn visit(
        &self,
        state: &mut BuildState<'_>,
        index: usize,
        dir: &Path,
        depth: usize,
        context: &IgnoreContext,
    ) {
        // A spent budget still lists the directory so its content counts as omitted
        let listing = state.enumerator.list(dir, depth, context, state.remaining);
        if let Some(left) = state.remaining.as_mut() {
            *left = left.saturating_sub(listing.entries.len());
        }
        state.tree.mark_truncated(index, listing.omitted);

        for entry in listing.entries {
            let descend = entry.is_descendable() && !self.at_max_depth(depth + 1);
            let child = state.tree.push_child(index, entry.kind, entry.relative);

            // Recurse before the next sibling so the subtree stays contiguous
            if descend {
                let child_context = state.aggregator.descend(context, &entry.path);
                self.visit(state, child, &entry.path, depth + 1, &child_context);
            }
        }
    }
}
