//! Conversion stage.
//!
//! Applies every registered converter matching a page's original extension,
//! in registration order, and gives the page's destination the output
//! extension of the last converter applied.

use crate::build::convert::applicable;
use crate::build::paths::replace_extension;
use crate::build::pipeline::{PipelineContext, PipelineError, RenderError, Stage};
use crate::build::site::Site;

/// Stage that chains converters over each page's contents.
///
/// Matching is decided once per page from the extension of its original
/// path. A converter producing, say, `.html` does not make the page eligible
/// for converters that match `html`.
///
/// The stage is meant to run once per build: running it again on converted
/// output may convert twice.
pub struct ConvertStage;

impl Stage for ConvertStage {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        for page in site.pages_mut() {
            let converters = applicable(ctx.converters, page.extension());
            let Some(last) = converters.last() else {
                continue;
            };

            // A failing chain leaves the page as it was
            let mut converted: Option<String> = None;
            for converter in &converters {
                log::debug!(
                    "converting {} with {}",
                    page.path().display(),
                    converter.name()
                );
                let input = converted.as_deref().unwrap_or(&page.contents);
                let output = converter
                    .convert(input)
                    .map_err(|e| RenderError::new(page.path(), e))?;
                converted = Some(output);
            }
            if let Some(contents) = converted {
                page.contents = contents;
            }

            page.destination_path = page
                .destination_path
                .as_deref()
                .map(|dest| replace_extension(dest, last.output_extension()));
        }

        Ok(())
    }
}
