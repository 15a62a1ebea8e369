//! Test harness for gitree integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("gitree-test-")
            .tempdir()
            .expect("Failed to create temp dir");
        Self { dir }
    }

    /// A repo with a `.git` directory, which must never show up in output.
    pub fn with_git_dir() -> Self {
        let repo = Self::new();
        repo.add_file(".git/HEAD", "ref: refs/heads/main\n");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

pub fn run_gitree(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_gitree");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run gitree");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Lines of tree output with connectors stripped, e.g. `src/` or `main.rs`.
pub fn entry_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| {
            line.trim_start_matches(['│', '├', '└', '─', ' '])
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let repo = TestRepo::new();
        assert!(repo.path().exists());
    }

    #[test]
    fn test_harness_git_dir() {
        let repo = TestRepo::with_git_dir();
        assert!(repo.path().join(".git").is_dir());
    }

    #[test]
    fn test_entry_names_strips_connectors() {
        let names = entry_names("root/\n├── a.txt\n│   └── b.txt\n└── c/\n");
        assert_eq!(names, vec!["root/", "a.txt", "b.txt", "c/"]);
    }
}
