//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Destination paths (relative paths within the output directory)
//! - URL paths (the URL at which content will be served)

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Replace the extension of a path, keeping its directory and stem.
///
/// # Examples
/// ```ignore
/// replace_extension("blog/post.md", "html") => "blog/post.html"
/// replace_extension("blog/index", "html") => "blog/index.html"
/// ```
pub fn replace_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Convert a destination path to the URL it is served at.
///
/// `index.html` files are served at their directory.
///
/// # Examples
/// ```ignore
/// destination_to_url("about/index.html") => "/about/"
/// destination_to_url("index.html") => "/"
/// destination_to_url("css/site.css") => "/css/site.css"
/// ```
pub fn destination_to_url(destination: &Path) -> String {
    let path_str = destination.to_string_lossy().replace('\\', "/");

    if path_str == "index.html" {
        return "/".to_string();
    }
    if let Some(dir) = path_str.strip_suffix("/index.html") {
        return format!("/{dir}/");
    }
    format!("/{path_str}")
}

/// Convert a URL to a destination path for a page with the given extension.
///
/// Directory URLs (trailing slash) get an `index` file carrying `extension`;
/// the conversion pass later swaps that extension for the converted one.
///
/// # Examples
/// ```ignore
/// url_to_destination("/about/", "md") => "about/index.md"
/// url_to_destination("/", "md") => "index.md"
/// url_to_destination("/feed.xml", "md") => "feed.xml"
/// ```
pub fn url_to_destination(url: &str, extension: &str) -> PathBuf {
    let trimmed = url.trim_start_matches('/');
    let index = if extension.is_empty() {
        "index".to_string()
    } else {
        format!("index.{extension}")
    };

    if trimmed.is_empty() {
        PathBuf::from(index)
    } else if trimmed.ends_with('/') {
        Path::new(trimmed.trim_end_matches('/')).join(index)
    } else {
        PathBuf::from(trimmed)
    }
}

/// Split a leading `YYYY-MM-DD-` date off a file stem.
///
/// # Examples
/// ```ignore
/// split_date_prefix("2024-03-01-hello") => (Some(2024-03-01), "hello")
/// split_date_prefix("hello") => (None, "hello")
/// ```
pub fn split_date_prefix(stem: &str) -> (Option<NaiveDate>, &str) {
    let (Some(prefix), Some(rest)) = (stem.get(..10), stem.get(10..)) else {
        return (None, stem);
    };
    let Some(slug) = rest.strip_prefix('-') else {
        return (None, stem);
    };
    match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        Ok(date) if !slug.is_empty() => (Some(date), slug),
        _ => (None, stem),
    }
}
