//! Layered configuration
//!
//! Settings come from three layers, highest priority first: command-line
//! flags, a JSON config file, and built-in defaults. Each layer is a
//! [`FileConfig`] where every key is optional; [`FileConfig::merge`] stacks
//! them and [`FileConfig::into_tree_config`] produces the validated result.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tree::{EntryOrder, TreeConfig};

/// Config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".gitree/config.json";

/// One configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_first: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirs_first: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_gitignore: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_max_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_max_entries: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_file_types: Option<Vec<String>>,
}

impl FileConfig {
    /// The built-in defaults, with every key set.
    pub fn defaults() -> Self {
        let base = TreeConfig::default();
        Self {
            max_items: base.max_items,
            max_entries: base.max_entries,
            max_depth: base.max_depth,
            gitignore_depth: Some(base.gitignore_depth),
            exclude_depth: Some(base.exclude_depth),
            hidden_items: Some(false),
            files_first: Some(false),
            dirs_first: Some(false),
            no_gitignore: Some(false),
            no_files: Some(false),
            no_max_items: Some(false),
            no_max_entries: Some(false),
            exclude: Some(Vec::new()),
            include: Some(Vec::new()),
            include_file_types: Some(Vec::new()),
        }
    }

    /// Read a config file. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(path, e)),
        };

        let config = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Write the defaults to `path`, unless a file is already there.
    ///
    /// Returns `false` if an existing file was left untouched.
    pub fn write_default(path: &Path) -> Result<bool> {
        if path.exists() {
            tracing::warn!("config already exists at {}", path.display());
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut json = serde_json::to_string_pretty(&Self::defaults()).map_err(|source| {
            Error::Config {
                path: path.to_path_buf(),
                source,
            }
        })?;
        json.push('\n');
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        tracing::info!("created config at {}", path.display());
        Ok(true)
    }

    /// Fill keys unset in `self` from `lower`.
    pub fn merge(self, lower: FileConfig) -> FileConfig {
        FileConfig {
            max_items: self.max_items.or(lower.max_items),
            max_entries: self.max_entries.or(lower.max_entries),
            max_depth: self.max_depth.or(lower.max_depth),
            gitignore_depth: self.gitignore_depth.or(lower.gitignore_depth),
            exclude_depth: self.exclude_depth.or(lower.exclude_depth),
            hidden_items: self.hidden_items.or(lower.hidden_items),
            files_first: self.files_first.or(lower.files_first),
            dirs_first: self.dirs_first.or(lower.dirs_first),
            no_gitignore: self.no_gitignore.or(lower.no_gitignore),
            no_files: self.no_files.or(lower.no_files),
            no_max_items: self.no_max_items.or(lower.no_max_items),
            no_max_entries: self.no_max_entries.or(lower.no_max_entries),
            exclude: self.exclude.or(lower.exclude),
            include: self.include.or(lower.include),
            include_file_types: self.include_file_types.or(lower.include_file_types),
        }
    }

    /// Resolve this layer (merged over the defaults) into a validated config.
    pub fn into_tree_config(self) -> Result<TreeConfig> {
        let c = self.merge(Self::defaults());
        let flag = |v: Option<bool>| v.unwrap_or(false);

        let order = if flag(c.files_first) {
            EntryOrder::FilesFirst
        } else if flag(c.dirs_first) {
            EntryOrder::DirsFirst
        } else {
            EntryOrder::Interleaved
        };

        let config = TreeConfig {
            respect_gitignore: !flag(c.no_gitignore),
            gitignore_depth: c.gitignore_depth.unwrap_or_default(),
            exclude_depth: c.exclude_depth.unwrap_or_default(),
            max_depth: c.max_depth,
            max_items: if flag(c.no_max_items) { None } else { c.max_items },
            max_entries: if flag(c.no_max_entries) { None } else { c.max_entries },
            show_hidden: flag(c.hidden_items),
            no_files: flag(c.no_files),
            order,
            extra_excludes: c.exclude.unwrap_or_default(),
            include_patterns: c.include.unwrap_or_default(),
            include_file_types: c.include_file_types.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// The config file to use: `explicit` if given, else the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
