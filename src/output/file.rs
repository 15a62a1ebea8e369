//! Saving rendered trees to a file

use std::path::PathBuf;

/// Names ending in one of these are used as given.
const KEPT_EXTENSIONS: [&str; 2] = [".txt", ".md"];

/// The file `--output NAME` writes to: `NAME` itself for `.txt`/`.md`
/// names, otherwise `NAME.txt`.
pub fn output_path(name: &str) -> PathBuf {
    if KEPT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}.txt", name))
    }
}
