//! Excerpt stage.

use crate::build::pipeline::{PipelineContext, PipelineError, Stage};
use crate::build::site::Site;

/// Stage that extracts each page's excerpt.
///
/// An `excerpt` front matter value wins; otherwise the excerpt is the
/// contents before the first `site.excerpt_separator`. Excerpts stay in the
/// page's source format.
pub struct ExcerptStage;

impl Stage for ExcerptStage {
    fn name(&self) -> &'static str {
        "excerpts"
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let separator = ctx.config.site.excerpt_separator.as_str();

        for page in site.pages_mut() {
            let excerpt = match &page.front_matter.excerpt {
                Some(excerpt) => excerpt.trim().to_string(),
                None => extract(&page.contents, separator),
            };
            page.excerpt = (!excerpt.is_empty()).then_some(excerpt);
        }

        Ok(())
    }
}

/// Line endings are normalized to `\n` first, so the default separator
/// also splits CRLF sources.
fn extract(contents: &str, separator: &str) -> String {
    let contents = contents.replace("\r\n", "\n");
    let contents = contents.trim_start();
    let head = match contents.find(separator) {
        Some(end) if !separator.is_empty() => &contents[..end],
        _ => contents,
    };
    head.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::pipeline::testing::{page, run_stage, site};
    use crate::build::site::SourceFile;
    use crate::config::Config;

    fn excerpt_of(page: SourceFile, config: &Config) -> Option<String> {
        let mut site = site(vec![page]);
        run_stage(&ExcerptStage, &mut site, config).unwrap();
        site.pages().next().unwrap().excerpt.clone()
    }

    #[test]
    fn test_first_paragraph() {
        let page = SourceFile::new("a.md", "\nFirst *paragraph*.\n\nSecond one.\n");
        assert_eq!(
            excerpt_of(page, &Config::default()).as_deref(),
            Some("First *paragraph*.")
        );
    }

    #[test]
    fn test_crlf_first_paragraph() {
        let page = SourceFile::new("a.md", "First line\r\nstill first.\r\n\r\nSecond one.\r\n");
        assert_eq!(
            excerpt_of(page, &Config::default()).as_deref(),
            Some("First line\nstill first.")
        );
    }

    #[test]
    fn test_whole_contents_without_separator() {
        let page = SourceFile::new("a.md", "Only line\n");
        assert_eq!(
            excerpt_of(page, &Config::default()).as_deref(),
            Some("Only line")
        );
    }

    #[test]
    fn test_custom_separator() {
        let mut config = Config::default();
        config.site.excerpt_separator = "<!--more-->".to_string();
        let page = SourceFile::new("a.md", "One\n\nTwo\n<!--more-->\nThree");

        assert_eq!(excerpt_of(page, &config).as_deref(), Some("One\n\nTwo"));
    }

    #[test]
    fn test_front_matter_excerpt() {
        let page = page("a.md", "excerpt: Hand written", "Body text");
        assert_eq!(
            excerpt_of(page, &Config::default()).as_deref(),
            Some("Hand written")
        );
    }

    #[test]
    fn test_empty_page_has_no_excerpt() {
        let page = SourceFile::new("a.md", "  \n");
        assert_eq!(excerpt_of(page, &Config::default()), None);
    }
}
