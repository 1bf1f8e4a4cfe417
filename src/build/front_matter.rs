//! YAML front matter parsing.
//!
//! Front matter is a YAML block delimited by `---` lines at the very start of
//! a file:
//!
//! ```markdown
//! ---
//! title: My Page
//! layout: default
//! custom_field: custom value
//! ---
//!
//! # Content starts here
//! ```
//!
//! A file with front matter is a page and flows through the pipeline; a file
//! without it is copied verbatim.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Front matter metadata parsed from a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Page title (can override filename-derived title)
    pub title: Option<String>,
    /// Page description for SEO/previews
    pub description: Option<String>,
    /// Layout template wrapping the converted content
    pub layout: Option<String>,
    /// Explicit output url, e.g. `/about/` or `/feed.xml`
    pub permalink: Option<String>,
    /// Publication date, e.g. `2024-03-01` or `2024-03-01 09:30`
    pub date: Option<String>,
    /// Collection override (defaults to the top-level directory)
    pub collection: Option<String>,
    /// Name of the collection this page paginates
    pub paginate: Option<String>,
    /// Items per paginated page
    pub per_page: Option<usize>,
    /// Explicit excerpt, replacing the automatic one
    pub excerpt: Option<String>,
    /// `false` keeps the page out of the output
    pub published: Option<bool>,
    /// `false` skips in-place templating for this page
    pub render: Option<bool>,
    /// Additional arbitrary metadata (available in templates at top level, e.g., `page.author`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    pub fn is_published(&self) -> bool {
        self.published.unwrap_or(true)
    }

    pub fn renders_in_place(&self) -> bool {
        self.render.unwrap_or(true)
    }
}

/// Result of splitting a file into front matter and body.
#[derive(Debug)]
pub struct ParsedContent {
    /// The parsed front matter
    pub front_matter: FrontMatter,
    /// 1-based line of each top-level front matter key in the original file
    pub key_lines: HashMap<String, usize>,
    /// The content without the front matter block
    pub content: String,
}

/// Invalid YAML inside a front matter block.
#[derive(thiserror::Error, Debug)]
#[error("invalid front matter: {source}")]
pub struct FrontMatterError {
    /// 1-based line in the original file, when the YAML parser reports one
    pub line: Option<usize>,
    pub source: serde_yaml::Error,
}

/// Parse front matter from the start of a file.
///
/// Returns `Ok(None)` when the file has no (closed) front matter block.
pub fn parse_front_matter(content: &str) -> Result<Option<ParsedContent>, FrontMatterError> {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok(None);
    };

    // Find the closing delimiter line
    let mut offset = 0;
    let mut closing = None;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            closing = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((yaml_end, body_start)) = closing else {
        return Ok(None);
    };

    let yaml = &rest[..yaml_end];
    let front_matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        // The opening delimiter occupies line 1 of the file
        serde_yaml::from_str(yaml).map_err(|source| FrontMatterError {
            line: source.location().map(|loc| loc.line() + 1),
            source,
        })?
    };

    Ok(Some(ParsedContent {
        front_matter,
        key_lines: key_lines(yaml),
        content: rest[body_start..].to_string(),
    }))
}

/// Map top-level YAML keys to their line in the original file.
fn key_lines(yaml: &str) -> HashMap<String, usize> {
    yaml.lines()
        .enumerate()
        .filter(|(_, line)| !line.starts_with([' ', '\t', '#', '-']))
        .filter_map(|(index, line)| {
            let (key, _) = line.split_once(':')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), index + 2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter_basic() {
        let content = "---\ntitle: My Page\ndescription: A test page\n---\n\n# Hello World\n";
        let parsed = parse_front_matter(content).unwrap().unwrap();

        assert_eq!(parsed.front_matter.title, Some("My Page".to_string()));
        assert_eq!(
            parsed.front_matter.description,
            Some("A test page".to_string())
        );
        assert_eq!(parsed.content, "\n# Hello World\n");
    }

    #[test]
    fn test_parse_front_matter_with_custom_fields() {
        let content = "---\ntitle: Custom Page\nauthor: Jane Doe\ntags:\n  - rust\n  - docs\n---\nContent here\n";
        let parsed = parse_front_matter(content).unwrap().unwrap();

        assert_eq!(parsed.front_matter.title, Some("Custom Page".to_string()));
        assert!(parsed.front_matter.extra.contains_key("author"));
        assert!(parsed.front_matter.extra.contains_key("tags"));
    }

    #[test]
    fn test_no_front_matter() {
        assert!(parse_front_matter("# Just Markdown\n").unwrap().is_none());
        assert!(parse_front_matter("body { color: red }").unwrap().is_none());
    }

    #[test]
    fn test_unclosed_front_matter_is_not_a_page() {
        assert!(parse_front_matter("---\ntitle: x\n").unwrap().is_none());
    }

    #[test]
    fn test_empty_front_matter() {
        let parsed = parse_front_matter("---\n---\n# Content").unwrap().unwrap();
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.front_matter.is_published());
        assert_eq!(parsed.content, "# Content");
    }

    #[test]
    fn test_key_lines() {
        let content = "---\ntitle: Post\ntags:\n  - a\ndate: 2024-01-01\n---\nbody";
        let parsed = parse_front_matter(content).unwrap().unwrap();

        assert_eq!(parsed.key_lines.get("title"), Some(&2));
        assert_eq!(parsed.key_lines.get("date"), Some(&5));
        assert!(!parsed.key_lines.contains_key("- a"));
    }

    #[test]
    fn test_invalid_yaml_reports_file_line() {
        let content = "---\ntitle: ok\nbad: [unclosed\n---\nbody";
        let err = parse_front_matter(content).unwrap_err();

        let line = err.line.unwrap();
        assert!(line >= 3, "line {line} should point into the YAML block");
    }

    #[test]
    fn test_published_flag() {
        let parsed = parse_front_matter("---\npublished: false\n---\n")
            .unwrap()
            .unwrap();
        assert!(!parsed.front_matter.is_published());
    }
}
