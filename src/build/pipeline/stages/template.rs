//! Template rendering stages.
//!
//! The same stage type runs twice in the default pipeline:
//! - before conversion, rendering Tera syntax inside page contents
//!   (variables, loops over collections, macros from `_layouts/macros.html`)
//! - after conversion, wrapping the converted contents in the page's layout

use crate::build::pipeline::{PipelineContext, PipelineError, RenderError, Stage};
use crate::build::render::{PageContext, SiteContext, TemplateError};
use crate::build::site::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    InPlace,
    Layout,
}

/// Stage that renders pages through Tera.
pub struct TemplateStage {
    mode: Mode,
}

impl TemplateStage {
    /// Render each page's own contents as a template.
    ///
    /// Pages with `render: false` in their front matter are left alone.
    pub fn in_place() -> Self {
        Self { mode: Mode::InPlace }
    }

    /// Render converted contents through the `layout` named in front matter.
    ///
    /// The layout sees the converted contents as `content`. Pages without a
    /// `layout` key are left alone.
    pub fn using_template() -> Self {
        Self { mode: Mode::Layout }
    }
}

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        match self.mode {
            Mode::InPlace => "in_place_templates",
            Mode::Layout => "layouts",
        }
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let site_context = SiteContext::new(site, ctx.config);

        for index in 0..site.files.len() {
            let Some(page) = site.page(index) else {
                continue;
            };
            if page.destination_path.is_none() {
                continue;
            }

            let mut context = PageContext::new(site_context.clone(), page, site);
            let rendered = match self.mode {
                Mode::InPlace if page.front_matter.renders_in_place() => {
                    ctx.renderer.render_in_place(&page.contents, &context)
                }
                Mode::Layout => match &page.front_matter.layout {
                    Some(layout) => {
                        context.content = Some(page.contents.clone());
                        ctx.renderer.render_layout(layout, &context)
                    }
                    None => continue,
                },
                Mode::InPlace => continue,
            };

            let contents = rendered.map_err(|e| {
                let line = match e {
                    TemplateError::LayoutNotFound(_) => page.line_of("layout"),
                    TemplateError::Tera(_) => None,
                };
                RenderError::new(page.path(), e).at_line(line)
            })?;

            if let Some(page) = site.files[index].as_page_mut() {
                page.contents = contents;
            }
        }

        Ok(())
    }
}
