//! Filtered listing of a single directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::pattern::PatternSet;

use super::config::{EntryOrder, TreeConfig};
use super::ignore_context::IgnoreContext;
use super::node::NodeKind;
use super::utils::{is_hidden, matches_file_type, relative_posix};

/// One surviving child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    /// Posix path relative to the traversal root.
    pub relative: String,
    pub name: String,
    pub kind: NodeKind,
    /// Symlinked directories are listed but never descended into.
    pub is_symlink: bool,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Whether the tree builder may recurse into this entry.
    pub fn is_descendable(&self) -> bool {
        self.is_dir() && !self.is_symlink
    }
}

/// Result of listing one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<Entry>,
    /// Entries that passed the filters but were cut by `max_items` or the
    /// remaining `max_entries` budget.
    pub omitted: usize,
}

impl Listing {
    pub fn is_truncated(&self) -> bool {
        self.omitted > 0
    }
}

/// Lists directory children, applying hidden/ignore/exclude/include filters,
/// ordering, and per-directory caps.
pub struct DirectoryEnumerator<'a> {
    root: &'a Path,
    config: &'a TreeConfig,
    excludes: &'a PatternSet,
    includes: &'a PatternSet,
}

impl<'a> DirectoryEnumerator<'a> {
    pub fn new(
        root: &'a Path,
        config: &'a TreeConfig,
        excludes: &'a PatternSet,
        includes: &'a PatternSet,
    ) -> Self {
        Self {
            root,
            config,
            excludes,
            includes,
        }
    }

    /// List `dir`, which sits at `depth` below the root.
    ///
    /// `budget` is what is left of the cumulative `max_entries` cap. An
    /// unreadable directory yields an empty listing.
    pub fn list(
        &self,
        dir: &Path,
        depth: usize,
        context: &IgnoreContext,
        budget: Option<usize>,
    ) -> Listing {
        let read = match fs::read_dir(dir) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("cannot read directory {}: {}", dir.display(), e);
                return Listing::default();
            }
        };

        let mut entries = Vec::new();
        for item in read {
            let item = match item {
                Ok(i) => i,
                Err(e) => {
                    tracing::warn!("cannot read entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if let Some(entry) = self.accept(item, depth, context) {
                entries.push(entry);
            }
        }

        sort_entries(&mut entries, self.config.order);
        let mut listing = Listing {
            entries,
            omitted: 0,
        };

        if let Some(max) = self.config.max_items {
            cap(&mut listing, max);
        }
        if let Some(left) = budget {
            cap(&mut listing, left);
        }
        listing
    }

    fn accept(
        &self,
        item: fs::DirEntry,
        depth: usize,
        context: &IgnoreContext,
    ) -> Option<Entry> {
        let name = item.file_name().to_string_lossy().to_string();
        if name == ".git" || (!self.config.show_hidden && is_hidden(&name)) {
            return None;
        }

        let path = item.path();
        let (kind, is_symlink) = entry_kind(&item, &path)?;
        let is_dir = kind == NodeKind::Directory;
        let relative = relative_posix(self.root, &path);

        if context.is_ignored(&relative, is_dir) {
            return None;
        }
        if depth <= self.config.exclude_depth && self.excludes.matches(&relative, is_dir) {
            return None;
        }
        if !is_dir {
            if self.config.no_files {
                return None;
            }
            if self.config.has_allowlist() && !self.allowed(&path, &relative) {
                return None;
            }
        }

        Some(Entry {
            path,
            relative,
            name,
            kind,
            is_symlink,
        })
    }

    fn allowed(&self, path: &Path, relative: &str) -> bool {
        self.includes.matches(relative, false)
            || matches_file_type(path, &self.config.include_file_types)
    }
}

/// Classify an entry, following symlinks. Broken links are dropped.
fn entry_kind(item: &fs::DirEntry, path: &Path) -> Option<(NodeKind, bool)> {
    let file_type = match item.file_type() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("cannot stat {}: {}", path.display(), e);
            return None;
        }
    };

    if file_type.is_symlink() {
        return match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Some((NodeKind::Directory, true)),
            Ok(_) => Some((NodeKind::File, true)),
            Err(_) => {
                tracing::debug!("skipping broken symlink {}", path.display());
                None
            }
        };
    }

    if file_type.is_dir() {
        Some((NodeKind::Directory, false))
    } else {
        Some((NodeKind::File, false))
    }
}

fn sort_entries(entries: &mut [Entry], order: EntryOrder) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    match order {
        EntryOrder::Interleaved => {}
        EntryOrder::DirsFirst => entries.sort_by_key(|e| !e.is_dir()),
        EntryOrder::FilesFirst => entries.sort_by_key(|e| e.is_dir()),
    }
}

fn cap(listing: &mut Listing, max: usize) {
    if listing.entries.len() > max {
        listing.omitted += listing.entries.len() - max;
        listing.entries.truncate(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;

    fn names(listing: &Listing) -> Vec<&str> {
        listing.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn list_root(t: &TestTree, config: &TreeConfig) -> Listing {
        let excludes = PatternSet::compile(&config.extra_excludes);
        let includes = PatternSet::compile(&config.include_patterns);
        let en = DirectoryEnumerator::new(t.path(), config, &excludes, &includes);
        en.list(t.path(), 0, &IgnoreContext::empty(0), None)
    }

    #[test]
    fn test_max_items_truncates() {
        let t = TestTree::new();
        t.add_file("a.txt", "");
        t.add_file("b.txt", "");
        t.add_file("c.txt", "");

        let config = TreeConfig {
            max_items: Some(1),
            ..TreeConfig::unbounded()
        };
        let listing = list_root(&t, &config);
        assert_eq!(listing.entries.len(), 1);
        assert!(listing.is_truncated());
        assert_eq!(listing.omitted, 2);
    }

    #[test]
    fn test_budget_truncates() {
        let t = TestTree::new();
        t.add_file("a.txt", "");
        t.add_file("b.txt", "");

        let config = TreeConfig::unbounded();
        let excludes = PatternSet::empty();
        let includes = PatternSet::empty();
        let en = DirectoryEnumerator::new(t.path(), &config, &excludes, &includes);
        let listing = en.list(t.path(), 0, &IgnoreContext::empty(0), Some(1));
        assert_eq!(names(&listing), vec!["a.txt"]);
        assert_eq!(listing.omitted, 1);
    }

    #[test]
    fn test_hidden_entries_dropped_unless_shown() {
        let t = TestTree::new();
        t.add_file(".env", "");
        t.add_file("main.rs", "");
        t.add_dir(".git");

        let listing = list_root(&t, &TreeConfig::unbounded());
        assert_eq!(names(&listing), vec!["main.rs"]);

        let config = TreeConfig {
            show_hidden: true,
            ..TreeConfig::unbounded()
        };
        let listing = list_root(&t, &config);
        assert_eq!(names(&listing), vec![".env", "main.rs"]);
    }

    #[test]
    fn test_ordering_modes() {
        let t = TestTree::new();
        t.add_file("b.txt", "");
        t.add_dir("a");
        t.add_dir("c");

        let mut config = TreeConfig::unbounded();
        assert_eq!(names(&list_root(&t, &config)), vec!["a", "b.txt", "c"]);

        config.order = EntryOrder::DirsFirst;
        assert_eq!(names(&list_root(&t, &config)), vec!["a", "c", "b.txt"]);

        config.order = EntryOrder::FilesFirst;
        assert_eq!(names(&list_root(&t, &config)), vec!["b.txt", "a", "c"]);
    }

    #[test]
    fn test_allowlist_only_applies_to_files() {
        let t = TestTree::new();
        t.add_file("main.rs", "");
        t.add_file("notes.txt", "");
        t.add_file("script.py", "");
        t.add_dir("docs");

        let config = TreeConfig {
            include_patterns: vec!["*.rs".to_string()],
            include_file_types: vec!["py".to_string()],
            ..TreeConfig::unbounded()
        };
        let listing = list_root(&t, &config);
        assert_eq!(names(&listing), vec!["docs", "main.rs", "script.py"]);
    }

    #[test]
    fn test_extra_excludes_respect_exclude_depth() {
        let t = TestTree::new();
        t.add_file("a.log", "");
        t.add_file("sub/b.log", "");

        let config = TreeConfig {
            extra_excludes: vec!["*.log".to_string()],
            exclude_depth: 0,
            ..TreeConfig::unbounded()
        };
        let excludes = PatternSet::compile(&config.extra_excludes);
        let includes = PatternSet::empty();
        let en = DirectoryEnumerator::new(t.path(), &config, &excludes, &includes);

        let top = en.list(t.path(), 0, &IgnoreContext::empty(0), None);
        assert_eq!(names(&top), vec!["sub"]);

        let sub = en.list(&t.path().join("sub"), 1, &IgnoreContext::empty(1), None);
        assert_eq!(names(&sub), vec!["b.log"]);
    }

    #[test]
    fn test_no_files_lists_directories_only() {
        let t = TestTree::new();
        t.add_file("a.txt", "");
        t.add_dir("d");

        let config = TreeConfig {
            no_files: true,
            ..TreeConfig::unbounded()
        };
        assert_eq!(names(&list_root(&t, &config)), vec!["d"]);
    }

    #[test]
    fn test_missing_directory_yields_empty_listing() {
        let t = TestTree::new();
        let config = TreeConfig::unbounded();
        let excludes = PatternSet::empty();
        let en = DirectoryEnumerator::new(t.path(), &config, &excludes, &excludes);
        let listing = en.list(&t.path().join("gone"), 1, &IgnoreContext::empty(1), None);
        assert!(listing.entries.is_empty());
        assert!(!listing.is_truncated());
    }
}
