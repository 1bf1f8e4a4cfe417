//! Helpers shared by stage tests.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use super::{PipelineContext, PipelineError, Stage};
use crate::build::convert::Converter;
use crate::build::front_matter::parse_front_matter;
use crate::build::render::Renderer;
use crate::build::site::{Site, SiteFile, SourceFile};
use crate::config::Config;

/// Fixed build time: 2024-06-01 12:00.
pub fn build_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// A site made of the given pages.
pub fn site(pages: Vec<SourceFile>) -> Site {
    Site::new(
        PathBuf::from("."),
        pages.into_iter().map(SiteFile::Page).collect(),
    )
}

/// A page parsed from front matter YAML and a body.
pub fn page(path: &str, front_matter: &str, body: &str) -> SourceFile {
    let source = format!("---\n{front_matter}\n---\n{body}");
    let parsed = parse_front_matter(&source).unwrap().unwrap();
    SourceFile::from_parsed(path, parsed)
}

/// Run one stage with an empty renderer and no converters.
pub fn run_stage(stage: &dyn Stage, site: &mut Site, config: &Config) -> Result<(), PipelineError> {
    let mut renderer = Renderer::empty();
    run_stage_with(stage, site, config, &mut renderer, &[])
}

/// Run one stage with the given renderer and converters.
pub fn run_stage_with(
    stage: &dyn Stage,
    site: &mut Site,
    config: &Config,
    renderer: &mut Renderer,
    converters: &[Box<dyn Converter>],
) -> Result<(), PipelineError> {
    let mut ctx = PipelineContext::new(config, renderer, converters, build_time());
    stage.process(site, &mut ctx)
}
