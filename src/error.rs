//! Error types for gitree
//!
//! Only failures that should abort the whole run live here. Per-directory
//! problems (unreadable directories or ignore files) are logged and treated
//! as empty, and malformed patterns fall back to literal matching.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that stop a run before (or instead of) producing output.
#[derive(Debug, Error)]
pub enum Error {
    /// A root path given on the command line does not exist.
    #[error("path not found: {0}")]
    RootNotFound(PathBuf),

    /// A root path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A wildcard root argument did not match anything.
    #[error("no matches found for pattern: {0}")]
    NoGlobMatches(String),

    /// A numeric cap is outside its accepted range.
    #[error("--{name} must be >= {min} and <= {max} (got {value})")]
    InvalidCap {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// The configuration file exists but could not be parsed.
    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing rendered output failed.
    #[error("error writing output: {0}")]
    Output(#[source] std::io::Error),

    /// The interactive picker could not drive the terminal.
    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    /// An I/O failure at the top level of a run.
    #[error("I/O error for path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
