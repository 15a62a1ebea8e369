//! Tree formatting and display
//!
//! - `config` - Output configuration types
//! - `tree` - Text tree formatter (console, optionally colored)
//! - `json` - JSON output
//! - `file` - Output file naming

mod config;
mod file;
mod json;
mod tree;

pub use config::OutputConfig;
pub use file::output_path;
pub use json::{JsonRoot, print_json, to_json};
pub use tree::TreeFormatter;
