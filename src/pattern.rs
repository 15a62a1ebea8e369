//! Gitignore-style pattern sets
//!
//! A [`PatternSet`] is an ordered list of [`Pattern`]s compiled into a single
//! gitignore matcher. Patterns are always evaluated against paths relative to
//! the traversal root; patterns read from nested ignore files are rebased onto
//! the directory that defined them before they are added.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// A single ignore rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    negated: bool,
    source_depth: usize,
}

impl Pattern {
    /// Parse one line of an ignore file.
    ///
    /// Returns `None` for blank lines and `#` comments.
    pub fn parse(line: &str, source_depth: usize) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (negated, text) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            negated,
            source_depth,
        })
    }

    /// The glob text, without the leading `!`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Depth of the directory whose ignore file defined this pattern.
    pub fn source_depth(&self) -> usize {
        self.source_depth
    }

    pub fn is_dir_only(&self) -> bool {
        self.text.ends_with('/')
    }

    /// Rewrite this pattern so it matches root-relative paths.
    ///
    /// `prefix` is the posix path of the defining directory relative to the
    /// traversal root (empty for the root itself). Anchored patterns (leading
    /// or inner `/`) are joined directly onto the prefix; unanchored ones match
    /// at any depth below it, as they would in the defining directory.
    pub fn rebased(&self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            return self.clone();
        }

        let dir_only = self.is_dir_only();
        let body = self.text.trim_end_matches('/');
        let (anchored, body) = match body.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (body.contains('/'), body),
        };

        let mut text = if anchored {
            format!("{}/{}", prefix, body)
        } else {
            format!("{}/**/{}", prefix, body)
        };
        if dir_only {
            text.push('/');
        }

        Self {
            text,
            negated: self.negated,
            source_depth: self.source_depth,
        }
    }

    /// The pattern as a gitignore line.
    pub fn to_line(&self) -> String {
        if self.negated {
            format!("!{}", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// An ordered, compiled set of patterns.
///
/// Later patterns override earlier ones for the same path: the last matching
/// pattern decides, and a negated match means "not ignored".
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    matcher: Gitignore,
}

impl PatternSet {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: Gitignore::empty(),
        }
    }

    /// Compile raw pattern strings (ignore-file syntax) defined at the root.
    pub fn compile<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = lines
            .into_iter()
            .filter_map(|line| Pattern::parse(line.as_ref(), 0))
            .collect();
        Self::from_patterns(patterns)
    }

    /// Compile an already parsed pattern list.
    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        if patterns.is_empty() {
            return Self::empty();
        }

        let mut builder = GitignoreBuilder::new(".");
        for pattern in &patterns {
            add_pattern(&mut builder, pattern);
        }

        let matcher = builder.build().unwrap_or_else(|e| {
            tracing::warn!("failed to compile ignore patterns: {}", e);
            Gitignore::empty()
        });

        Self { patterns, matcher }
    }

    /// A new set with `more` appended after the current patterns.
    pub fn extended(&self, more: impl IntoIterator<Item = Pattern>) -> Self {
        let mut patterns = self.patterns.clone();
        let before = patterns.len();
        patterns.extend(more);
        if patterns.len() == before {
            return self.clone();
        }
        Self::from_patterns(patterns)
    }

    /// Whether `relative_path` (posix, relative to the traversal root) is
    /// matched by this set.
    pub fn matches(&self, relative_path: &str, is_directory: bool) -> bool {
        if self.patterns.is_empty() || relative_path.is_empty() {
            return false;
        }
        self.matcher
            .matched(Path::new(relative_path), is_directory)
            .is_ignore()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Add a pattern, retrying as an escaped literal if it is not a valid glob.
fn add_pattern(builder: &mut GitignoreBuilder, pattern: &Pattern) {
    let line = pattern.to_line();
    if builder.add_line(None, &line).is_ok() {
        return;
    }

    let mut literal = glob::Pattern::escape(pattern.text());
    if pattern.is_negated() {
        literal.insert(0, '!');
    }
    match builder.add_line(None, &literal) {
        Ok(_) => tracing::debug!("pattern {:?} is not a valid glob, matching literally", line),
        Err(e) => tracing::debug!("dropping unusable pattern {:?}: {}", line, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        assert!(Pattern::parse("", 0).is_none());
        assert!(Pattern::parse("   ", 0).is_none());
        assert!(Pattern::parse("# comment", 0).is_none());
        assert!(Pattern::parse("!", 0).is_none());

        let p = Pattern::parse("!keep.log", 2).unwrap();
        assert!(p.is_negated());
        assert_eq!(p.text(), "keep.log");
        assert_eq!(p.source_depth(), 2);
    }

    #[test]
    fn test_rebase_unanchored_matches_below_prefix() {
        let p = Pattern::parse("*.log", 1).unwrap().rebased("a");
        assert_eq!(p.text(), "a/**/*.log");

        let p = Pattern::parse("build/", 1).unwrap().rebased("a/b");
        assert_eq!(p.text(), "a/b/**/build/");
        assert!(p.is_dir_only());
    }

    #[test]
    fn test_rebase_anchored_joins_prefix() {
        let p = Pattern::parse("/x.txt", 1).unwrap().rebased("a");
        assert_eq!(p.text(), "a/x.txt");

        let p = Pattern::parse("!docs/*.md", 1).unwrap().rebased("a");
        assert_eq!(p.text(), "a/docs/*.md");
        assert!(p.is_negated());
    }

    #[test]
    fn test_rebase_at_root_is_identity() {
        let p = Pattern::parse("/target", 0).unwrap();
        assert_eq!(p.rebased(""), p);
    }

    #[test]
    fn test_last_match_wins() {
        let set = PatternSet::compile(["*.log", "!keep.log"]);
        assert!(set.matches("debug.log", false));
        assert!(!set.matches("keep.log", false));
        assert!(!set.matches("main.rs", false));

        let set = PatternSet::compile(["!keep.log", "*.log"]);
        assert!(set.matches("keep.log", false));
    }

    #[test]
    fn test_directory_only_pattern() {
        let set = PatternSet::compile(["build/"]);
        assert!(set.matches("build", true));
        assert!(set.matches("src/build", true));
        assert!(!set.matches("build", false));
    }

    #[test]
    fn test_double_star() {
        let set = PatternSet::compile(["docs/**/*.tmp"]);
        assert!(set.matches("docs/a/b/c.tmp", false));
        assert!(set.matches("docs/c.tmp", false));
        assert!(!set.matches("src/c.tmp", false));
    }

    #[test]
    fn test_leading_slash_anchors_to_root() {
        let set = PatternSet::compile(["/todo.txt"]);
        assert!(set.matches("todo.txt", false));
        assert!(!set.matches("sub/todo.txt", false));
    }

    #[test]
    fn test_rebased_patterns_only_apply_inside_their_directory() {
        let p = Pattern::parse("x.txt", 1).unwrap().rebased("a");
        let set = PatternSet::from_patterns(vec![p]);
        assert!(set.matches("a/x.txt", false));
        assert!(set.matches("a/deeper/x.txt", false));
        assert!(!set.matches("x.txt", false));
        assert!(!set.matches("b/x.txt", false));
    }

    #[test]
    fn test_malformed_pattern_matches_literally() {
        let set = PatternSet::compile(["weird[name"]);
        assert_eq!(set.len(), 1);
        assert!(set.matches("weird[name", false));
        assert!(!set.matches("weirdname", false));
    }

    #[test]
    fn test_extended_appends_after_existing() {
        let base = PatternSet::compile(["*.log"]);
        let more = base.extended(Pattern::parse("!keep.log", 1));
        assert_eq!(more.len(), 2);
        assert!(!more.matches("keep.log", false));
        assert!(base.matches("keep.log", false));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::empty();
        assert!(set.is_empty());
        assert!(!set.matches("anything", false));
        assert!(!set.matches("", true));
    }
}
