//! Configuration type definitions.
//!
//! This module contains all the data structures used in `kiln.yaml`.
//! These types are pure data - no I/O or complex logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Root config
// =============================================================================

/// Root site configuration - everything a build needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub stylesheet: StylesheetConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub url: Option<String>,
    /// Directory holding the site sources (relative to the config file)
    #[serde(default = "default_source")]
    pub source: PathBuf,
    /// Directory the built site is written to (relative to the config file)
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Directory holding layout templates (relative to the source directory)
    #[serde(default = "default_layouts")]
    pub layouts: PathBuf,
    /// File and directory names skipped while loading
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Top-level directories whose pages form named collections
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,
    /// How output paths and urls are derived for pages
    #[serde(default)]
    pub permalink: PermalinkStyle,
    /// Publish pages dated after the build time
    #[serde(default)]
    pub future: bool,
    /// Marker ending the automatic excerpt
    #[serde(default = "default_excerpt_separator")]
    pub excerpt_separator: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "My Kiln Site".to_string(),
            url: None,
            source: default_source(),
            output: default_output(),
            layouts: default_layouts(),
            exclude: Vec::new(),
            collections: default_collections(),
            permalink: PermalinkStyle::default(),
            future: false,
            excerpt_separator: default_excerpt_separator(),
        }
    }
}

fn default_source() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

fn default_layouts() -> PathBuf {
    PathBuf::from("_layouts")
}

fn default_collections() -> Vec<String> {
    vec!["posts".to_string()]
}

fn default_excerpt_separator() -> String {
    "\n\n".to_string()
}

/// Permalink style applied to pages without an explicit `permalink`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermalinkStyle {
    /// `about.md` -> `/about/` (written to `about/index.html`)
    #[default]
    Pretty,
    /// `about.md` -> `/about.html`
    Plain,
    /// Dated collection pages -> `/posts/2024/03/01/hello/`
    Date,
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
    /// Highlighting theme used by `kiln init` to generate code block styles
    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "definition_lists".to_string(),
        "footnotes".to_string(),
        "gfm".to_string(),
        "heading_attributes".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

fn default_highlight_theme() -> String {
    "github-dark".to_string()
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
            highlight_theme: default_highlight_theme(),
        }
    }
}

// =============================================================================
// Stylesheet configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StylesheetConfig {
    /// Minify converted stylesheets
    #[serde(default)]
    pub minify: bool,
}

// =============================================================================
// Pagination configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items per page when a page doesn't set `per_page`
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// Path of pages 2..N relative to the paginated page, `:num` is the page number
    #[serde(default = "default_pagination_path")]
    pub path: String,
}

fn default_per_page() -> usize {
    10
}

fn default_pagination_path() -> String {
    "page/:num".to_string()
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            path: default_pagination_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: Config = serde_yaml::from_str("site:\n  name: Blog\n").unwrap();

        assert_eq!(config.site.name, "Blog");
        assert_eq!(config.site.output, PathBuf::from("_site"));
        assert_eq!(config.site.collections, vec!["posts".to_string()]);
        assert_eq!(config.site.permalink, PermalinkStyle::Pretty);
        assert_eq!(config.pagination.per_page, 10);
        assert!(!config.stylesheet.minify);
    }

    #[test]
    fn test_permalink_style_lowercase() {
        let config: Config =
            serde_yaml::from_str("site:\n  name: Blog\n  permalink: date\n").unwrap();
        assert_eq!(config.site.permalink, PermalinkStyle::Date);
    }
}
