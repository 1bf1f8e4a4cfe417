//! Pluggable content converters.
//!
//! A converter turns a page's text from one format into another (Markdown to
//! HTML, SCSS to CSS) and declares the extension its output carries. The
//! conversion pass applies every converter matching a page's original
//! extension, in registration order, and gives the page the output extension
//! of the last one applied.
//!
//! # Adding a New Converter
//!
//! ```ignore
//! struct AsciidocConverter;
//!
//! impl Converter for AsciidocConverter {
//!     fn name(&self) -> &'static str { "asciidoc" }
//!     fn output_extension(&self) -> &str { "html" }
//!     fn matches(&self, extension: &str) -> bool { extension == "adoc" }
//!     fn convert(&self, content: &str) -> Result<String, ConvertError> {
//!         // Convert AsciiDoc to HTML...
//!     }
//! }
//!
//! pipeline.add_converter(AsciidocConverter);
//! ```

use pulldown_cmark::Options;

use crate::build::highlight::SyntaxHighlighter;
use crate::build::markdown::{MarkdownError, markdown_options, render_markdown};
use crate::config::MarkdownConfig;

/// Error during conversion.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    /// Generic conversion error for custom converters.
    #[error("conversion failed: {0}")]
    Failed(String),

    #[error("markdown error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("stylesheet error: {0}")]
    Stylesheet(String),
}

/// An extension-gated text transformation.
///
/// Implementations must be pure: `matches` and `convert` have no side effects
/// and `output_extension` never changes.
pub trait Converter: Send + Sync {
    /// The name of this converter, for logging.
    fn name(&self) -> &'static str;

    /// Extension (without dot) that converted output carries.
    fn output_extension(&self) -> &str;

    /// Whether this converter applies to files with the given extension.
    fn matches(&self, extension: &str) -> bool;

    /// Convert content.
    fn convert(&self, content: &str) -> Result<String, ConvertError>;
}

/// Converters that apply to an extension, in registration order.
pub fn applicable<'c>(
    converters: &'c [Box<dyn Converter>],
    extension: &str,
) -> Vec<&'c dyn Converter> {
    converters
        .iter()
        .filter(|c| c.matches(extension))
        .map(|c| &**c)
        .collect()
}

/// Output extension a file with `extension` ends up with after conversion.
///
/// The last matching converter wins; `None` when nothing matches.
pub fn output_extension_for<'c>(
    converters: &'c [Box<dyn Converter>],
    extension: &str,
) -> Option<&'c str> {
    converters
        .iter()
        .rev()
        .find(|c| c.matches(extension))
        .map(|c| c.output_extension())
}

/// Markdown converter.
///
/// Uses pulldown-cmark for parsing and the syntax highlighter for code blocks.
pub struct MarkdownConverter {
    options: Options,
    highlighter: SyntaxHighlighter,
}

impl MarkdownConverter {
    /// Create a converter, rejecting unknown extension names up front.
    pub fn new(config: &MarkdownConfig) -> Result<Self, MarkdownError> {
        Ok(Self {
            options: markdown_options(&config.extensions)?,
            highlighter: SyntaxHighlighter::new(&config.highlight_theme),
        })
    }
}

impl Converter for MarkdownConverter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn output_extension(&self) -> &str {
        "html"
    }

    fn matches(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case("md") || extension.eq_ignore_ascii_case("markdown")
    }

    fn convert(&self, content: &str) -> Result<String, ConvertError> {
        Ok(render_markdown(content, self.options, &self.highlighter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Suffix(&'static str, &'static str, &'static str);

    impl Converter for Suffix {
        fn name(&self) -> &'static str {
            "suffix"
        }
        fn output_extension(&self) -> &str {
            self.2
        }
        fn matches(&self, extension: &str) -> bool {
            extension == self.0
        }
        fn convert(&self, content: &str) -> Result<String, ConvertError> {
            Ok(format!("{content}{}", self.1))
        }
    }

    fn converters() -> Vec<Box<dyn Converter>> {
        vec![
            Box::new(Suffix("md", "+first", "html")),
            Box::new(Suffix("scss", "+css", "css")),
            Box::new(Suffix("md", "+second", "xhtml")),
        ]
    }

    #[test]
    fn test_applicable_keeps_registration_order() {
        let converters = converters();
        let names: Vec<&str> = applicable(&converters, "md")
            .iter()
            .map(|c| c.output_extension())
            .collect();
        assert_eq!(names, vec!["html", "xhtml"]);
        assert!(applicable(&converters, "txt").is_empty());
    }

    #[test]
    fn test_output_extension_last_match_wins() {
        let converters = converters();
        assert_eq!(output_extension_for(&converters, "md"), Some("xhtml"));
        assert_eq!(output_extension_for(&converters, "scss"), Some("css"));
        assert_eq!(output_extension_for(&converters, "txt"), None);
    }

    #[test]
    fn test_markdown_converter() {
        let converter = MarkdownConverter::new(&MarkdownConfig::default()).unwrap();

        assert!(converter.matches("md"));
        assert!(converter.matches("MD"));
        assert!(converter.matches("markdown"));
        assert!(!converter.matches("txt"));
        assert_eq!(converter.output_extension(), "html");

        let html = converter.convert("Hello *world*").unwrap();
        assert!(html.contains("<em>world</em>"));
    }

    #[test]
    fn test_markdown_converter_rejects_unknown_extension() {
        let config = MarkdownConfig {
            extensions: vec!["not_a_real_extension".to_string()],
            ..MarkdownConfig::default()
        };
        assert!(MarkdownConverter::new(&config).is_err());
    }
}
