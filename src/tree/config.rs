//! Configuration types for tree building

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound accepted for `max_items` and `max_entries`.
pub const MAX_CAP: usize = 10_000;

/// How files and directories are grouped within one directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    /// Sorted by name, files and directories mixed.
    #[default]
    Interleaved,
    DirsFirst,
    FilesFirst,
}

/// Configuration for tree building behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Read `.gitignore` files while descending.
    pub respect_gitignore: bool,
    /// Deepest directory level whose `.gitignore` is still read (root = 0).
    pub gitignore_depth: usize,
    /// Deepest directory level at which `extra_excludes` apply (root = 0).
    pub exclude_depth: usize,
    /// Directories at this depth are listed but not expanded. `None` = unlimited.
    pub max_depth: Option<usize>,
    /// Per-directory entry cap.
    pub max_items: Option<usize>,
    /// Cumulative entry cap for one root.
    pub max_entries: Option<usize>,
    pub show_hidden: bool,
    /// List directories only.
    pub no_files: bool,
    pub order: EntryOrder,
    pub extra_excludes: Vec<String>,
    /// File allowlist patterns. When this or `include_file_types` is set,
    /// a file must match one of them to be listed.
    pub include_patterns: Vec<String>,
    pub include_file_types: Vec<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            gitignore_depth: 5,
            exclude_depth: 5,
            max_depth: Some(5),
            max_items: Some(20),
            max_entries: Some(40),
            show_hidden: false,
            no_files: false,
            order: EntryOrder::Interleaved,
            extra_excludes: Vec::new(),
            include_patterns: Vec::new(),
            include_file_types: Vec::new(),
        }
    }
}

impl TreeConfig {
    /// Default filtering with every depth and count cap lifted.
    pub fn unbounded() -> Self {
        Self {
            gitignore_depth: usize::MAX,
            exclude_depth: usize::MAX,
            max_depth: None,
            max_items: None,
            max_entries: None,
            ..Default::default()
        }
    }

    /// Reject caps outside `1..=MAX_CAP`.
    pub fn validate(&self) -> Result<()> {
        check_cap("max-items", self.max_items)?;
        check_cap("max-entries", self.max_entries)?;
        Ok(())
    }

    /// Whether a file allowlist is configured.
    pub fn has_allowlist(&self) -> bool {
        !self.include_patterns.is_empty() || !self.include_file_types.is_empty()
    }
}

fn check_cap(name: &'static str, value: Option<usize>) -> Result<()> {
    match value {
        Some(v) if !(1..=MAX_CAP).contains(&v) => Err(Error::InvalidCap {
            name,
            value: v,
            min: 1,
            max: MAX_CAP,
        }),
        _ => Ok(()),
    }
}
