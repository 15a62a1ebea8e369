//! Flat, index-addressed tree produced by [`TreeBuilder`](super::TreeBuilder)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Path recorded for the root node.
pub const ROOT_MARKER: &str = "(root)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

/// One entry of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Posix path relative to the root, or [`ROOT_MARKER`] for the root.
    pub path: String,
    pub depth: usize,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Last path component, or the root marker.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Absolute path of this node under `root`.
    pub fn absolute(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(&self.path)
        }
    }
}

/// Nodes in depth-first order plus parent-to-children index maps.
///
/// A node's identity is its index in `nodes`. Child subtrees follow their
/// parent contiguously, so nesting can be recovered from `depth` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    folder_to_files: BTreeMap<usize, Vec<usize>>,
    folder_to_subdirs: BTreeMap<usize, Vec<usize>>,
    /// Directory index -> number of entries dropped by the item/entry caps.
    truncated: BTreeMap<usize, usize>,
}

impl Tree {
    pub(crate) fn with_root() -> Self {
        Self {
            nodes: vec![TreeNode {
                kind: NodeKind::Directory,
                path: ROOT_MARKER.to_string(),
                depth: 0,
            }],
            ..Default::default()
        }
    }

    /// Append a child of `parent` and return its index.
    pub(crate) fn push_child(&mut self, parent: usize, kind: NodeKind, path: String) -> usize {
        let depth = self.nodes[parent].depth + 1;
        let index = self.nodes.len();
        self.nodes.push(TreeNode { kind, path, depth });

        let map = match kind {
            NodeKind::Directory => &mut self.folder_to_subdirs,
            NodeKind::File => &mut self.folder_to_files,
        };
        map.entry(parent).or_default().push(index);
        index
    }

    pub(crate) fn mark_truncated(&mut self, dir: usize, omitted: usize) {
        if omitted > 0 {
            *self.truncated.entry(dir).or_default() += omitted;
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn folder_to_files(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.folder_to_files
    }

    pub fn folder_to_subdirs(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.folder_to_subdirs
    }

    pub fn files_of(&self, dir: usize) -> &[usize] {
        self.folder_to_files
            .get(&dir)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn subdirs_of(&self, dir: usize) -> &[usize] {
        self.folder_to_subdirs
            .get(&dir)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Direct children of `dir` in listing order.
    pub fn children_of(&self, dir: usize) -> Vec<usize> {
        let mut children: Vec<usize> = self
            .files_of(dir)
            .iter()
            .chain(self.subdirs_of(dir))
            .copied()
            .collect();
        children.sort_unstable();
        children
    }

    /// Entries dropped from `dir` by the caps (0 if not truncated).
    pub fn omitted(&self, dir: usize) -> usize {
        self.truncated.get(&dir).copied().unwrap_or(0)
    }

    pub fn is_truncated(&self, dir: usize) -> bool {
        self.omitted(dir) > 0
    }

    /// Indices of every file node, in tree order.
    pub fn file_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_dir())
            .map(|(i, _)| i)
    }

    /// (directories excluding the root, files)
    pub fn counts(&self) -> (usize, usize) {
        let dirs = self.nodes.iter().filter(|n| n.is_dir()).count();
        (dirs.saturating_sub(1), self.nodes.len() - dirs)
    }
}
