//! Markdown rendering with syntax highlighting and heading anchors.

use std::collections::HashSet;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use super::highlight::SyntaxHighlighter;
use crate::util::slugify;

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Translate configured extension names into parser options.
pub fn markdown_options(extensions: &[String]) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in extensions {
        match extension.as_str() {
            "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
            "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
            "gfm" => options.insert(Options::ENABLE_GFM),
            "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
            "smart_punctuation" => options.insert(Options::ENABLE_SMART_PUNCTUATION),
            "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
            "tables" => options.insert(Options::ENABLE_TABLES),
            "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
            other => return Err(MarkdownError::InvalidExtension(other.to_string())),
        }
    }
    Ok(options)
}

/// A heading whose id is generated once its text is known.
struct PendingHeading {
    level: HeadingLevel,
    classes: Vec<String>,
    text: String,
}

/// Render markdown to an HTML fragment.
///
/// Fenced code blocks go through the highlighter; headings without an
/// explicit id get a unique slug id and a `#` anchor link.
pub fn render_markdown(markdown: &str, options: Options, highlighter: &SyntaxHighlighter) -> String {
    let parser = Parser::new_ext(markdown, options);

    let mut code: Option<(String, String)> = None;
    let mut heading: Option<PendingHeading> = None;
    let mut used_ids: HashSet<String> = HashSet::new();

    let events: Vec<Event> = parser
        .filter_map(|event| match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((language, String::new()));
                None
            }
            Event::End(TagEnd::CodeBlock) => {
                let (language, source) = code.take().unwrap_or_default();
                Some(Event::Html(highlighter.highlight(&source, &language).into()))
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, source)) = code.as_mut() {
                    source.push_str(&text);
                }
                None
            }
            Event::Start(Tag::Heading {
                level,
                id: None,
                classes,
                ..
            }) => {
                heading = Some(PendingHeading {
                    level,
                    classes: classes.iter().map(|c| c.to_string()).collect(),
                    text: String::new(),
                });
                None
            }
            Event::Start(Tag::Heading { id: Some(ref id), .. }) => {
                used_ids.insert(id.to_string());
                Some(event)
            }
            Event::Text(text) | Event::Code(text) if heading.is_some() => {
                if let Some(pending) = heading.as_mut() {
                    pending.text.push_str(&text);
                }
                None
            }
            Event::End(TagEnd::Heading(_)) if heading.is_some() => {
                let pending = heading.take()?;
                let id = unique_id(&slugify(&pending.text), &mut used_ids);
                Some(Event::Html(heading_html(&pending, &id)))
            }
            // Inline markup inside a generated heading is flattened to text
            _ if heading.is_some() => None,
            _ => Some(event),
        })
        .collect();

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

fn unique_id(base: &str, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "section" } else { base };
    let mut id = base.to_string();
    let mut suffix = 1;
    while used.contains(&id) {
        id = format!("{base}-{suffix}");
        suffix += 1;
    }
    used.insert(id.clone());
    id
}

fn heading_html(heading: &PendingHeading, id: &str) -> CowStr<'static> {
    let level = heading.level as usize;
    let class_attr = if heading.classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", heading.classes.join(" "))
    };
    format!(
        "<h{level} id=\"{id}\"{class_attr}>{text} <a class=\"header-anchor\" href=\"#{id}\" aria-label=\"Link to this heading\">#</a></h{level}>\n",
        text = crate::util::html_escape(&heading.text),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        let options = markdown_options(&["tables".to_string()]).unwrap();
        render_markdown(markdown, options, &SyntaxHighlighter::default())
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = render("# Hello\n\nWorld");

        assert!(html.contains("<h1 id=\"hello\">Hello"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let html = render("## Setup\n\n## Setup\n");

        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-1\""));
    }

    #[test]
    fn test_render_code_block() {
        let html = render("```rust\nlet x = 1;\n```");

        assert!(html.contains("let"));
        assert!(html.contains("<pre"));
    }

    #[test]
    fn test_invalid_extension() {
        let result = markdown_options(&["not_a_real_extension".to_string()]);
        assert!(matches!(result, Err(MarkdownError::InvalidExtension(_))));
    }
}
