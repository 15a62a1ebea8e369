//! Per-directory ignore rule aggregation
//!
//! Each directory level gets its own immutable [`IgnoreContext`]. Descending
//! into a child directory produces a new context from the parent's, adding the
//! child's `.gitignore` rules (rebased to the traversal root) while the
//! gitignore depth limit allows it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::pattern::{Pattern, PatternSet};

use super::utils::relative_posix;

/// Name of the per-directory ignore file.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Effective ignore patterns at one directory of the traversal.
#[derive(Debug, Clone)]
pub struct IgnoreContext {
    patterns: Rc<PatternSet>,
    depth: usize,
}

impl IgnoreContext {
    /// A context with no patterns at the given depth.
    pub fn empty(depth: usize) -> Self {
        Self {
            patterns: Rc::new(PatternSet::empty()),
            depth,
        }
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Directory depth below the traversal root (root = 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_ignored(&self, relative_path: &str, is_directory: bool) -> bool {
        self.patterns.matches(relative_path, is_directory)
    }
}

/// Builds [`IgnoreContext`]s for one traversal root.
#[derive(Debug, Clone)]
pub struct IgnoreAggregator {
    root: PathBuf,
    enabled: bool,
    max_depth: usize,
}

impl IgnoreAggregator {
    /// `gitignore_depth` is the deepest directory level whose ignore file is read.
    pub fn new(root: &Path, respect_gitignore: bool, gitignore_depth: usize) -> Self {
        Self {
            root: root.to_path_buf(),
            enabled: respect_gitignore,
            max_depth: gitignore_depth,
        }
    }

    /// The context for the traversal root, including the root's own ignore file.
    pub fn root_context(&self) -> IgnoreContext {
        self.context_for(&IgnoreContext::empty(0), &self.root, 0)
    }

    /// The context for `child_dir`, one level below `current`.
    pub fn descend(&self, current: &IgnoreContext, child_dir: &Path) -> IgnoreContext {
        self.context_for(current, child_dir, current.depth + 1)
    }

    fn context_for(&self, inherited: &IgnoreContext, dir: &Path, depth: usize) -> IgnoreContext {
        if !self.enabled {
            return IgnoreContext::empty(depth);
        }

        let patterns = if depth <= self.max_depth {
            let prefix = relative_posix(&self.root, dir);
            let own = read_ignore_file(dir, depth);
            if own.is_empty() {
                Rc::clone(&inherited.patterns)
            } else {
                tracing::debug!(
                    "loaded {} patterns from {}",
                    own.len(),
                    dir.join(IGNORE_FILE_NAME).display()
                );
                let rebased = own.iter().map(|p| p.rebased(&prefix));
                Rc::new(inherited.patterns.extended(rebased))
            }
        } else {
            Rc::clone(&inherited.patterns)
        };

        IgnoreContext { patterns, depth }
    }
}

/// Parse the ignore file directly inside `dir`, if there is one.
fn read_ignore_file(dir: &Path, depth: usize) -> Vec<Pattern> {
    let path = dir.join(IGNORE_FILE_NAME);
    if !path.is_file() {
        return Vec::new();
    }

    match fs::read(&path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .lines()
            .filter_map(|line| Pattern::parse(line, depth))
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
