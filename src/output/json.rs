//! JSON output formatting

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::tree::Tree;

/// One root's tree as serialized to JSON.
#[derive(Debug, Serialize)]
pub struct JsonRoot<'a> {
    pub root: &'a Path,
    #[serde(flatten)]
    pub tree: &'a Tree,
}

/// Serialize the trees of every root as pretty-printed JSON.
pub fn to_json(roots: &[JsonRoot<'_>]) -> io::Result<String> {
    serde_json::to_string_pretty(roots).map_err(io::Error::other)
}

/// Print the trees of every root as pretty-printed JSON to stdout.
pub fn print_json(roots: &[JsonRoot<'_>]) -> io::Result<()> {
    println!("{}", to_json(roots)?);
    Ok(())
}
