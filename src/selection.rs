//! Interactive selection state
//!
//! [`SelectionController`] is a pure state machine over a built [`Tree`]: a
//! cursor, one checked flag per node, and a terminal confirm/cancel state. It
//! knows nothing about keys or drawing; see `picker` for the terminal loop.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::tree::Tree;

/// Selection action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Move cursor up
    Up,
    /// Move cursor down
    Down,
    /// Flip the node under the cursor (and a directory's descendants)
    Toggle,
    /// Finish and keep the checked files
    Confirm,
    /// Finish with nothing selected
    Cancel,
}

/// Terminal state of a selection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Confirmed(BTreeSet<PathBuf>),
    Cancelled,
}

impl SelectionOutcome {
    /// The selected files; empty when cancelled.
    pub fn into_files(self) -> BTreeSet<PathBuf> {
        match self {
            SelectionOutcome::Confirmed(files) => files,
            SelectionOutcome::Cancelled => BTreeSet::new(),
        }
    }
}

/// Cursor and checked flags for one root's tree.
pub struct SelectionController<'a> {
    root: PathBuf,
    tree: &'a Tree,
    checked: Vec<bool>,
    cursor: usize,
    outcome: Option<SelectionOutcome>,
}

impl<'a> SelectionController<'a> {
    pub fn new(root: &Path, tree: &'a Tree) -> Self {
        Self {
            root: root.to_path_buf(),
            tree,
            checked: vec![false; tree.len()],
            cursor: 0,
            outcome: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Set once the pass is confirmed or cancelled.
    pub fn outcome(&self) -> Option<&SelectionOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Apply an action. Returns the outcome when the action ends the pass.
    ///
    /// Actions after the pass has ended are ignored.
    pub fn handle_action(&mut self, action: SelectionAction) -> Option<&SelectionOutcome> {
        if self.outcome.is_some() {
            return None;
        }

        match action {
            SelectionAction::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            SelectionAction::Down => {
                if self.cursor + 1 < self.tree.len() {
                    self.cursor += 1;
                }
            }
            SelectionAction::Toggle => self.toggle(self.cursor),
            SelectionAction::Confirm => {
                self.outcome = Some(SelectionOutcome::Confirmed(self.selected_files()));
            }
            SelectionAction::Cancel => {
                self.outcome = Some(SelectionOutcome::Cancelled);
            }
        }
        self.outcome.as_ref()
    }

    /// Flip `index`. A directory pushes its new state to every descendant.
    pub fn toggle(&mut self, index: usize) {
        let Some(node) = self.tree.get(index) else {
            return;
        };
        let state = !self.checked[index];

        if !node.is_dir() {
            self.checked[index] = state;
            return;
        }

        let mut stack = vec![index];
        while let Some(dir) = stack.pop() {
            self.checked[dir] = state;
            for &file in self.tree.files_of(dir) {
                self.checked[file] = state;
            }
            stack.extend_from_slice(self.tree.subdirs_of(dir));
        }
    }

    /// Absolute paths of every checked file node.
    pub fn selected_files(&self) -> BTreeSet<PathBuf> {
        self.tree
            .file_indices()
            .filter(|&i| self.checked[i])
            .map(|i| self.tree.nodes()[i].absolute(&self.root))
            .collect()
    }

    /// Consume the controller, yielding the outcome (cancelled if unfinished).
    pub fn into_outcome(self) -> SelectionOutcome {
        self.outcome.unwrap_or(SelectionOutcome::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;
    use crate::tree::{TreeBuilder, TreeConfig};

    /// (root), a, a/1.txt, a/2.txt, a/sub, a/sub/3.txt, b.txt
    fn sample() -> (TestTree, Tree) {
        let t = TestTree::new();
        t.add_file("a/1.txt", "");
        t.add_file("a/2.txt", "");
        t.add_file("a/sub/3.txt", "");
        t.add_file("b.txt", "");
        let tree = TreeBuilder::new(TreeConfig::unbounded())
            .build(t.path())
            .unwrap();
        (t, tree)
    }

    #[test]
    fn test_cursor_is_clamped() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.handle_action(SelectionAction::Up);
        assert_eq!(sel.cursor(), 0);
        for _ in 0..20 {
            sel.handle_action(SelectionAction::Down);
        }
        assert_eq!(sel.cursor(), tree.len() - 1);
    }

    #[test]
    fn test_toggle_file() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.handle_action(SelectionAction::Down);
        sel.handle_action(SelectionAction::Down);
        sel.handle_action(SelectionAction::Toggle);
        assert!(sel.is_checked(2));
        assert!(!sel.is_checked(1));
        sel.handle_action(SelectionAction::Toggle);
        assert!(!sel.is_checked(2));
    }

    #[test]
    fn test_toggle_directory_propagates() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.toggle(1);
        for i in 1..=5 {
            assert!(sel.is_checked(i), "node {} should be checked", i);
        }
        assert!(!sel.is_checked(6));

        sel.toggle(1);
        assert!((1..=5).all(|i| !sel.is_checked(i)));
    }

    #[test]
    fn test_unchecking_one_file_leaves_siblings() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.toggle(1);
        sel.toggle(2);
        assert!(!sel.is_checked(2));
        assert!(sel.is_checked(3));
        assert!(sel.is_checked(5));
        assert!(sel.is_checked(1));
    }

    #[test]
    fn test_root_toggle_then_confirm_selects_everything() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.handle_action(SelectionAction::Toggle);
        let outcome = sel.handle_action(SelectionAction::Confirm).cloned().unwrap();

        let expected: BTreeSet<PathBuf> = ["a/1.txt", "a/2.txt", "a/sub/3.txt", "b.txt"]
            .iter()
            .map(|p| t.path().join(p))
            .collect();
        assert_eq!(outcome, SelectionOutcome::Confirmed(expected));
    }

    #[test]
    fn test_cancel_yields_empty_selection() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.toggle(0);
        sel.handle_action(SelectionAction::Cancel);
        assert!(sel.into_outcome().into_files().is_empty());
    }

    #[test]
    fn test_finished_state_is_frozen() {
        let (t, tree) = sample();
        let mut sel = SelectionController::new(t.path(), &tree);
        sel.handle_action(SelectionAction::Confirm);
        assert!(sel.handle_action(SelectionAction::Toggle).is_none());
        assert!(!sel.is_checked(0));
        assert_eq!(
            sel.into_outcome(),
            SelectionOutcome::Confirmed(BTreeSet::new())
        );
    }
}
