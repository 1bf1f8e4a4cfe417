//! Configuration loading and types for kiln.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)

mod load;
mod types;

use std::path::PathBuf;

pub use load::{DEFAULT_CONFIG_FILE, base_path_from_config, resolve_config_path};
pub use types::{Config, MarkdownConfig, PermalinkStyle, StylesheetConfig};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    /// Resolve the source directory against the config file's directory.
    pub fn source_dir(&self, base_path: &std::path::Path) -> PathBuf {
        resolve_against(base_path, &self.site.source)
    }

    /// Resolve the output directory against the config file's directory.
    pub fn output_dir(&self, base_path: &std::path::Path) -> PathBuf {
        resolve_against(base_path, &self.site.output)
    }
}

fn resolve_against(base_path: &std::path::Path, path: &std::path::Path) -> PathBuf {
    if path.is_relative() {
        base_path.join(path)
    } else {
        path.to_path_buf()
    }
}
