//! Shared path helpers for tree building

use std::path::{Component, Path};

/// Path of `path` relative to `root`, with `/` separators.
///
/// Returns an empty string for the root itself or for paths outside it.
pub fn relative_posix(root: &Path, path: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        return String::new();
    };

    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Get the display name of a path, defaulting to "." for the root.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

/// Hidden entries are dot-prefixed.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Whether `path` has one of the given extensions.
///
/// Extensions compare case-insensitively and may be written as `rs`, `.rs`
/// or `*.rs`.
pub fn matches_file_type(path: &Path, types: &[String]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return false;
    };

    types.iter().any(|t| {
        let t = t.trim();
        let t = t.strip_prefix("*").unwrap_or(t);
        let t = t.strip_prefix('.').unwrap_or(t);
        !t.is_empty() && t.eq_ignore_ascii_case(&ext)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_relative_posix() {
        let root = PathBuf::from("/tmp/root");
        assert_eq!(relative_posix(&root, &root), "");
        assert_eq!(relative_posix(&root, &root.join("a")), "a");
        assert_eq!(relative_posix(&root, &root.join("a").join("b.txt")), "a/b.txt");
        assert_eq!(relative_posix(&root, Path::new("/elsewhere/x")), "");
    }

    #[test]
    fn test_matches_file_type_spellings() {
        let types = vec!["py".to_string(), ".RS".to_string(), "*.md".to_string()];
        assert!(matches_file_type(Path::new("a/main.py"), &types));
        assert!(matches_file_type(Path::new("lib.rs"), &types));
        assert!(matches_file_type(Path::new("README.MD"), &types));
        assert!(!matches_file_type(Path::new("notes.txt"), &types));
        assert!(!matches_file_type(Path::new("Makefile"), &types));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".env"));
        assert!(!is_hidden("src"));
    }
}
