//! Archive planning
//!
//! An [`ArchivePlan`] lists the files of a built tree with the names they
//! should carry inside an archive. Writing a container is left to an
//! [`ArchiveSink`]; [`DirectorySink`] mirrors the files into a directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::tree::Tree;

/// One file to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Absolute source path.
    pub source: PathBuf,
    /// Posix path inside the archive.
    pub name: String,
}

/// The files of one or more trees, in tree order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivePlan {
    entries: Vec<ArchiveEntry>,
}

impl ArchivePlan {
    /// Plan every file node of `tree`. `prefix` (usually the root's directory
    /// name) is prepended to archive names when several roots share an archive.
    pub fn from_tree(root: &Path, tree: &Tree, prefix: Option<&str>) -> Self {
        let entries = tree
            .file_indices()
            .map(|i| {
                let node = &tree.nodes()[i];
                let name = match prefix {
                    Some(p) => format!("{}/{}", p, node.path),
                    None => node.path.clone(),
                };
                ArchiveEntry {
                    source: node.absolute(root),
                    name,
                }
            })
            .collect();
        Self { entries }
    }

    /// Keep only entries whose source is in `selected`.
    pub fn retain_selected(&mut self, selected: &BTreeSet<PathBuf>) {
        self.entries.retain(|e| selected.contains(&e.source));
    }

    /// Append another plan's entries.
    pub fn extend(&mut self, other: ArchivePlan) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Feed every entry to `sink`. Returns the number of entries written.
    pub fn write_to<S: ArchiveSink>(&self, sink: &mut S) -> Result<usize> {
        let mut written = 0;
        for entry in &self.entries {
            if sink.add(entry)? {
                written += 1;
            }
        }
        Ok(written)
    }
}

/// Destination for archive entries.
pub trait ArchiveSink {
    /// Add one entry. Returns `Ok(false)` if the entry was skipped.
    fn add(&mut self, entry: &ArchiveEntry) -> Result<bool>;
}

/// Copies entries into a directory, recreating their relative layout.
pub struct DirectorySink {
    dest: PathBuf,
}

impl DirectorySink {
    pub fn create(dest: &Path) -> Result<Self> {
        fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
        Ok(Self {
            dest: dest.to_path_buf(),
        })
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }
}

impl ArchiveSink for DirectorySink {
    fn add(&mut self, entry: &ArchiveEntry) -> Result<bool> {
        let target = entry
            .name
            .split('/')
            .fold(self.dest.clone(), |acc, part| acc.join(part));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        match fs::copy(&entry.source, &target) {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("skipping {}: {}", entry.source.display(), e);
                Ok(false)
            }
        }
    }
}
