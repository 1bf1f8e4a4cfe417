//! Permalink stage.
//!
//! Decides where each page is written and the url it is served at. The
//! destination keeps the source extension; the conversion stage swaps it for
//! the converted one later. Urls are computed up front from the extension
//! the converters will produce, so templates can link to pages before they
//! are converted.

use std::path::{Component, Path, PathBuf};

use crate::build::convert::output_extension_for;
use crate::build::paths::{destination_to_url, replace_extension, url_to_destination};
use crate::build::pipeline::{PipelineContext, PipelineError, RenderError, Stage};
use crate::build::site::{Site, SourceFile};
use crate::config::PermalinkStyle;

/// Stage that sets `destination_path` and `url` on every page.
pub struct PermalinkStage;

impl Stage for PermalinkStage {
    fn name(&self) -> &'static str {
        "permalinks"
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let style = ctx.config.site.permalink;

        for page in site.pages_mut() {
            if !page.front_matter.is_published() {
                log::debug!("{} is unpublished", page.path().display());
                page.destination_path = None;
                page.url.clear();
                continue;
            }
            let Some(current) = page.destination_path.clone() else {
                continue;
            };

            let output_ext = output_extension_for(ctx.converters, page.extension())
                .unwrap_or(page.extension())
                .to_string();

            let destination = match &page.front_matter.permalink {
                Some(permalink) => {
                    let destination = url_to_destination(permalink, page.extension());
                    if !stays_in_output(&destination) {
                        return Err(RenderError::new(
                            page.path(),
                            format!("permalink '{permalink}' leaves the output directory"),
                        )
                        .at_line(page.line_of("permalink"))
                        .into());
                    }
                    destination
                }
                None => styled_destination(page, &current, style, &output_ext),
            };

            page.url = destination_to_url(&replace_extension(&destination, &output_ext));
            page.destination_path = Some(destination);
        }

        Ok(())
    }
}

/// Only plain names (and `.`) may appear in a destination.
fn stays_in_output(destination: &Path) -> bool {
    destination
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn styled_destination(
    page: &SourceFile,
    current: &Path,
    style: PermalinkStyle,
    output_ext: &str,
) -> PathBuf {
    let is_index = current.file_stem().is_some_and(|stem| stem == "index");
    if output_ext != "html" || is_index {
        return current.to_path_buf();
    }

    match style {
        PermalinkStyle::Plain => current.to_path_buf(),
        PermalinkStyle::Date => match (&page.collection, page.date) {
            (Some(collection), Some(date)) => Path::new(collection)
                .join(date.format("%Y/%m/%d").to_string())
                .join(page.slug())
                .join(index_file(page)),
            _ => pretty(page, current),
        },
        PermalinkStyle::Pretty => pretty(page, current),
    }
}

/// `dir/stem.md` -> `dir/stem/index.md`
fn pretty(page: &SourceFile, current: &Path) -> PathBuf {
    let stem = current.file_stem().unwrap_or_default();
    current
        .with_file_name(stem)
        .join(index_file(page))
}

fn index_file(page: &SourceFile) -> String {
    match page.extension() {
        "" => "index".to_string(),
        ext => format!("index.{ext}"),
    }
}
