use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tera::{Context, Tera};

use super::site::{Paginator, Site, SourceFile};
use crate::config::Config;

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("layout not found: {0}")]
    LayoutNotFound(String),
}

/// Template name used while rendering page contents in place.
const IN_PLACE_TEMPLATE_NAME: &str = "__in_place__";

/// Layout file that, when present, is imported into every page as `macros`.
const MACROS_TEMPLATE_NAME: &str = "macros.html";

/// The template renderer, wrapping Tera.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load every template under the layouts directory.
    ///
    /// A missing directory yields a renderer without layouts.
    pub fn new(layouts_dir: &Path) -> Result<Self, TemplateError> {
        if !layouts_dir.is_dir() {
            log::debug!(
                "no layouts directory at {}, rendering without layouts",
                layouts_dir.display()
            );
            return Ok(Self::empty());
        }

        let glob = layouts_dir.join("**/*");
        let mut tera = Tera::new(&glob.to_string_lossy())?;
        // Layouts receive already-converted HTML
        tera.autoescape_on(vec![]);

        log::debug!(
            "loaded {} layout(s) from {}",
            tera.get_template_names().count(),
            layouts_dir.display()
        );
        Ok(Self { tera })
    }

    /// A renderer without layouts.
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Self { tera }
    }

    /// A renderer with the given named templates.
    pub fn from_templates(templates: &[(&str, &str)]) -> Result<Self, TemplateError> {
        let mut renderer = Self::empty();
        renderer.tera.add_raw_templates(templates.to_vec())?;
        Ok(renderer)
    }

    /// Resolve a front matter layout name to a template name.
    ///
    /// `default` -> `default.html`, `feed.xml` -> `feed.xml`.
    pub fn layout_template_name(layout: &str) -> String {
        if Path::new(layout).extension().is_some() {
            layout.to_string()
        } else {
            format!("{layout}.html")
        }
    }

    /// Render page contents as a template (before conversion).
    ///
    /// The contents are added as a temporary template so they can import
    /// macros from the layouts directory.
    pub fn render_in_place(
        &mut self,
        content: &str,
        context: &PageContext,
    ) -> Result<String, TemplateError> {
        let has_macros = self
            .tera
            .get_template_names()
            .any(|name| name == MACROS_TEMPLATE_NAME);
        let source = if has_macros {
            format!("{{% import \"{MACROS_TEMPLATE_NAME}\" as macros %}}\n{content}")
        } else {
            content.to_string()
        };

        self.tera.add_raw_template(IN_PLACE_TEMPLATE_NAME, &source)?;
        let result = self.tera.render(IN_PLACE_TEMPLATE_NAME, &context.to_tera());
        self.tera.templates.remove(IN_PLACE_TEMPLATE_NAME);

        Ok(result?)
    }

    /// Render converted contents through a layout.
    pub fn render_layout(
        &self,
        layout: &str,
        context: &PageContext,
    ) -> Result<String, TemplateError> {
        let name = Self::layout_template_name(layout);
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(TemplateError::LayoutNotFound(name));
        }
        Ok(self.tera.render(&name, &context.to_tera())?)
    }
}

// =============================================================================
// Template contexts
// =============================================================================

/// Everything a template sees.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub site: SiteContext,
    pub page: PageInfo,
    pub paginator: Option<PaginatorContext>,
    /// Converted contents; only set when rendering a layout
    pub content: Option<String>,
}

impl PageContext {
    pub fn new(site: SiteContext, page: &SourceFile, all: &Site) -> Self {
        Self {
            site,
            page: PageInfo::from_page(page),
            paginator: page
                .paginator
                .as_ref()
                .map(|p| PaginatorContext::from_paginator(p, all)),
            content: None,
        }
    }

    fn to_tera(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("page", &self.page);
        if let Some(paginator) = &self.paginator {
            context.insert("paginator", paginator);
        }
        if let Some(content) = &self.content {
            context.insert("content", content);
        }
        context
    }
}

/// Site-level information, available as `site.*`.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub name: String,
    pub url: Option<String>,
    pub time: Option<NaiveDateTime>,
    /// Collection name -> pages, newest first
    pub collections: BTreeMap<String, Vec<PageSummary>>,
}

impl SiteContext {
    pub fn new(site: &Site, config: &Config) -> Self {
        let collections = site
            .collections
            .iter()
            .map(|(name, indices)| (name.clone(), summaries(site, indices)))
            .collect();

        Self {
            name: config.site.name.clone(),
            url: config.site.url.clone(),
            time: site.time,
            collections,
        }
    }
}

/// A short description of another page (collection listings, paginators).
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub title: String,
    pub url: String,
    pub date: Option<NaiveDateTime>,
    pub excerpt: Option<String>,
}

impl PageSummary {
    fn from_page(page: &SourceFile) -> Self {
        Self {
            title: page.title(),
            url: page.url.clone(),
            date: page.date,
            excerpt: page.excerpt.clone(),
        }
    }
}

fn summaries(site: &Site, indices: &[usize]) -> Vec<PageSummary> {
    indices
        .iter()
        .filter_map(|&index| site.page(index))
        .map(PageSummary::from_page)
        .collect()
}

/// Information about the current page, available as `page.*`.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub path: String,
    pub date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub collection: Option<String>,
    /// Custom front matter fields (flattened to top level, e.g., `page.author`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl PageInfo {
    pub fn from_page(page: &SourceFile) -> Self {
        Self {
            title: page.title(),
            url: page.url.clone(),
            path: page.path().to_string_lossy().replace('\\', "/"),
            date: page.date,
            description: page.front_matter.description.clone(),
            excerpt: page.excerpt.clone(),
            collection: page.collection.clone(),
            extra: page.front_matter.extra.clone(),
        }
    }
}

/// Pagination state, available as `paginator.*` on paginated pages.
#[derive(Debug, Serialize)]
pub struct PaginatorContext {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<PageSummary>,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PaginatorContext {
    fn from_paginator(paginator: &Paginator, site: &Site) -> Self {
        Self {
            page: paginator.page,
            per_page: paginator.per_page,
            total_pages: paginator.total_pages,
            total_items: paginator.total_items,
            items: summaries(site, &paginator.items),
            previous_url: paginator.previous_url.clone(),
            next_url: paginator.next_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::build::site::SiteFile;

    fn context_for(page: SourceFile) -> PageContext {
        let site = Site::new(PathBuf::from("."), vec![SiteFile::Page(page.clone())]);
        PageContext::new(SiteContext::new(&site, &Config::default()), &page, &site)
    }

    #[test]
    fn test_render_in_place() {
        let mut page = SourceFile::new("about.md", "");
        page.front_matter.title = Some("About".to_string());
        page.url = "/about/".to_string();

        let mut renderer = Renderer::empty();
        let output = renderer
            .render_in_place("# {{ page.title }} at {{ page.url }}", &context_for(page))
            .unwrap();

        assert_eq!(output, "# About at /about/");
    }

    #[test]
    fn test_render_in_place_does_not_escape() {
        let mut page = SourceFile::new("a.md", "");
        page.front_matter.title = Some("<b>Bold</b>".to_string());

        let mut renderer = Renderer::empty();
        let output = renderer
            .render_in_place("{{ page.title }}", &context_for(page))
            .unwrap();
        assert_eq!(output, "<b>Bold</b>");
    }

    #[test]
    fn test_render_in_place_uses_macros() {
        let mut renderer = Renderer::from_templates(&[(
            "macros.html",
            "{% macro shout(text) %}{{ text | upper }}{% endmacro shout %}",
        )])
        .unwrap();

        let output = renderer
            .render_in_place(
                "{{ macros::shout(text=\"hi\") }}",
                &context_for(SourceFile::new("a.md", "")),
            )
            .unwrap();
        assert!(output.ends_with("HI"));
    }

    #[test]
    fn test_render_layout() {
        let renderer = Renderer::from_templates(&[(
            "default.html",
            "<title>{{ site.name }}</title><main>{{ content }}</main>",
        )])
        .unwrap();

        let mut context = context_for(SourceFile::new("a.md", ""));
        context.content = Some("<p>hi</p>".to_string());

        let output = renderer.render_layout("default", &context).unwrap();
        assert_eq!(
            output,
            "<title>My Kiln Site</title><main><p>hi</p></main>"
        );
    }

    #[test]
    fn test_missing_layout() {
        let renderer = Renderer::empty();
        let context = context_for(SourceFile::new("a.md", ""));

        let result = renderer.render_layout("post", &context);
        assert!(matches!(result, Err(TemplateError::LayoutNotFound(name)) if name == "post.html"));
    }

    #[test]
    fn test_layout_template_name() {
        assert_eq!(Renderer::layout_template_name("default"), "default.html");
        assert_eq!(Renderer::layout_template_name("feed.xml"), "feed.xml");
    }

    #[test]
    fn test_renderer_without_layouts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(&dir.path().join("_layouts")).unwrap();
        assert_eq!(renderer.tera.get_template_names().count(), 0);
    }

    #[test]
    fn test_renderer_loads_layouts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layouts = dir.path().join("_layouts");
        std::fs::create_dir_all(&layouts).unwrap();
        std::fs::write(layouts.join("default.html"), "[{{ content }}]").unwrap();

        let renderer = Renderer::new(&layouts).unwrap();
        let mut context = context_for(SourceFile::new("a.md", ""));
        context.content = Some("x".to_string());
        assert_eq!(renderer.render_layout("default", &context).unwrap(), "[x]");
    }
}
