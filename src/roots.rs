//! Resolution of root path arguments

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A resolved traversal root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// How the root was written, for headers.
    pub label: String,
}

impl Root {
    /// Directory name, used to keep multi-root archive entries apart.
    pub fn dir_name(&self) -> String {
        crate::tree::display_name(&self.path)
    }
}

/// Resolve root arguments in order.
///
/// No arguments means the current directory. Arguments containing `*` or `?`
/// are expanded as globs, keeping only directory matches. Every plain root
/// must be an existing directory.
pub fn resolve_roots<S: AsRef<str>>(args: &[S]) -> Result<Vec<Root>> {
    if args.is_empty() {
        return Ok(vec![resolve_one(Path::new("."), ".".to_string())?]);
    }

    let mut roots: Vec<Root> = Vec::new();
    for arg in args {
        let arg = arg.as_ref();
        for root in expand(arg)? {
            if roots.iter().any(|r| r.path == root.path) {
                tracing::debug!("skipping duplicate root {}", root.path.display());
                continue;
            }
            roots.push(root);
        }
    }
    Ok(roots)
}

fn expand(arg: &str) -> Result<Vec<Root>> {
    if !arg.contains(['*', '?']) {
        return Ok(vec![resolve_one(Path::new(arg), arg.to_string())?]);
    }

    let paths = match glob::glob(arg) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!("{:?} is not a valid glob ({}), using it as a path", arg, e);
            return Ok(vec![resolve_one(Path::new(arg), arg.to_string())?]);
        }
    };

    let mut roots = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if !path.is_dir() => {
                tracing::debug!("skipping non-directory match {}", path.display());
            }
            Ok(path) => {
                let label = path.display().to_string();
                roots.push(resolve_one(&path, label)?);
            }
            Err(e) => tracing::warn!("cannot read {}: {}", e.path().display(), e.error()),
        }
    }

    if roots.is_empty() {
        return Err(Error::NoGlobMatches(arg.to_string()));
    }
    Ok(roots)
}

fn resolve_one(path: &Path, label: String) -> Result<Root> {
    let canonical = match fs::canonicalize(path) {
        Ok(p) => p,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::RootNotFound(absolute(path)));
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    if !canonical.is_dir() {
        return Err(Error::NotADirectory(canonical));
    }
    Ok(Root {
        path: canonical,
        label,
    })
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
