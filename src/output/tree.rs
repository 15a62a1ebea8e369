//! Tree formatter for text output
//!
//! This module provides `TreeFormatter`, which draws a built [`Tree`] with
//! box-drawing connectors, walking the index maps from the root.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::tree::Tree;

use super::config::OutputConfig;

/// Formatter for text tree output.
pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render `tree` to a plain string. `label` names the root line.
    pub fn format(&self, label: &str, tree: &Tree) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into a Vec cannot fail
        let _ = self.write_tree(&mut out, label, tree);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    /// Print `tree` to stdout, colored if enabled.
    pub fn print(&self, label: &str, tree: &Tree) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_tree(&mut stdout, label, tree)
    }

    pub fn write_tree<W: WriteColor>(&self, out: &mut W, label: &str, tree: &Tree) -> io::Result<()> {
        if tree.is_empty() {
            return Ok(());
        }

        self.write_dir_name(out, label)?;
        writeln!(out)?;
        self.write_children(out, tree, 0, "")?;

        if self.config.show_summary {
            let (dir_count, file_count) = tree.counts();
            writeln!(out)?;
            writeln!(out, "{} directories, {} files", dir_count, file_count)?;
        }
        Ok(())
    }

    fn write_children<W: WriteColor>(
        &self,
        out: &mut W,
        tree: &Tree,
        dir: usize,
        prefix: &str,
    ) -> io::Result<()> {
        let children = tree.children_of(dir);
        let omitted = tree.omitted(dir);
        let total = children.len();

        for (i, &child) in children.iter().enumerate() {
            let is_last = i + 1 == total && omitted == 0;
            let connector = if is_last { "└── " } else { "├── " };
            let node = &tree.nodes()[child];

            write!(out, "{}{}", prefix, connector)?;
            if node.is_dir() {
                self.write_dir_name(out, node.name())?;
                writeln!(out)?;
                let child_prefix = if is_last {
                    format!("{}    ", prefix)
                } else {
                    format!("{}│   ", prefix)
                };
                self.write_children(out, tree, child, &child_prefix)?;
            } else {
                writeln!(out, "{}", node.name())?;
            }
        }

        if omitted > 0 {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "{}└── ... and {} more", prefix, omitted)?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_dir_name<W: WriteColor>(&self, out: &mut W, name: &str) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        write!(out, "{}/", name.trim_end_matches('/'))?;
        out.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;
    use crate::tree::{TreeBuilder, TreeConfig};

    fn plain() -> TreeFormatter {
        TreeFormatter::new(OutputConfig {
            use_color: false,
            show_summary: true,
        })
    }

    #[test]
    fn test_format_nested_tree() {
        let t = TestTree::new();
        t.add_file("src/main.rs", "");
        t.add_file("src/lib.rs", "");
        t.add_file("README.md", "");

        let tree = TreeBuilder::new(TreeConfig::unbounded())
            .build(t.path())
            .unwrap();
        let output = plain().format("proj", &tree);
        let expected = "\
proj/
├── README.md
└── src/
    ├── lib.rs
    └── main.rs

1 directories, 3 files
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_format_truncated_directory() {
        let t = TestTree::new();
        t.add_file("a.txt", "");
        t.add_file("b.txt", "");
        t.add_file("c.txt", "");

        let config = TreeConfig {
            max_items: Some(1),
            ..TreeConfig::unbounded()
        };
        let tree = TreeBuilder::new(config).build(t.path()).unwrap();
        let output = plain().format("root", &tree);
        assert!(output.contains("├── a.txt\n"), "{}", output);
        assert!(output.contains("└── ... and 2 more\n"), "{}", output);
    }

    #[test]
    fn test_format_root_only() {
        let t = TestTree::new();
        t.add_file("a.txt", "");

        let config = TreeConfig {
            max_depth: Some(0),
            ..TreeConfig::unbounded()
        };
        let tree = TreeBuilder::new(config).build(t.path()).unwrap();
        let output = TreeFormatter::new(OutputConfig {
            use_color: false,
            show_summary: false,
        })
        .format("root", &tree);
        assert_eq!(output, "root/\n");
    }
}
