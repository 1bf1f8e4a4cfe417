//! Build pipeline for site processing.
//!
//! The pipeline transforms the site through a fixed series of stages:
//! 1. Build dates (publication dates, future pages unpublished)
//! 2. Collections (group pages, newest first)
//! 3. Permalinks (output paths and urls)
//! 4. Pagination (virtual pages for paginated collections)
//! 5. Excerpts
//! 6. In-place templates (Tera syntax in source-format contents)
//! 7. Conversion (Markdown to HTML, SCSS to CSS)
//! 8. Layouts (wrap converted contents in layout templates)
//!
//! Each stage runs over the whole site before the next one starts. The
//! first failure aborts the build; mutations made by earlier stages are
//! left in place.

mod context;
mod error;
pub mod stages;

#[cfg(test)]
pub(crate) mod testing;

pub use context::PipelineContext;
pub use error::{PipelineError, RenderError};

use stages::{
    BuildDateStage, CollectionStage, ConvertStage, ExcerptStage, PaginationStage,
    PermalinkStage, TemplateStage,
};

use crate::build::convert::{Converter, MarkdownConverter};
use crate::build::markdown::MarkdownError;
use crate::build::site::Site;
use crate::build::stylesheet::StylesheetConverter;
use crate::config::Config;

/// A stage in the site processing pipeline.
///
/// Stages transform the site sequentially. Each stage receives the whole
/// site and can modify it in place before the next stage runs.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used for insertion points).
    fn name(&self) -> &'static str;

    /// Process the site through this stage.
    ///
    /// The `ctx` provides access to shared resources like the renderer and
    /// the converter list.
    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError>;
}

/// The site processing pipeline.
///
/// Holds an ordered list of stages and, separately, the ordered list of
/// converters the conversion stage applies.
///
/// # Extension Points
///
/// Insert custom stages using `insert_before` or `insert_after`:
///
/// ```ignore
/// pipeline.insert_after("excerpts", MyCustomStage);
/// ```
///
/// Register extra converters using `add_converter`:
///
/// ```ignore
/// pipeline.add_converter(AsciidocConverter);
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    converters: Vec<Box<dyn Converter>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages and no converters.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            converters: Vec::new(),
        }
    }

    /// Create the default pipeline with standard stages and converters.
    pub fn default_pipeline(config: &Config) -> Result<Self, MarkdownError> {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(BuildDateStage)
            .add_stage(CollectionStage)
            .add_stage(PermalinkStage)
            .add_stage(PaginationStage)
            .add_stage(ExcerptStage)
            .add_stage(TemplateStage::in_place())
            .add_stage(ConvertStage)
            .add_stage(TemplateStage::using_template());

        pipeline
            .add_converter(MarkdownConverter::new(&config.markdown)?)
            .add_converter(StylesheetConverter::new(&config.stylesheet));

        Ok(pipeline)
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Insert a stage before the named stage.
    ///
    /// # Panics
    ///
    /// Panics if no stage with the given name exists.
    #[allow(dead_code)]
    pub fn insert_before<S: Stage + 'static>(&mut self, name: &str, stage: S) -> &mut Self {
        let pos = self.position(name);
        self.stages.insert(pos, Box::new(stage));
        self
    }

    /// Insert a stage after the named stage.
    ///
    /// # Panics
    ///
    /// Panics if no stage with the given name exists.
    #[allow(dead_code)]
    pub fn insert_after<S: Stage + 'static>(&mut self, name: &str, stage: S) -> &mut Self {
        let pos = self.position(name);
        self.stages.insert(pos + 1, Box::new(stage));
        self
    }

    fn position(&self, name: &str) -> usize {
        self.stages
            .iter()
            .position(|s| s.name() == name)
            .unwrap_or_else(|| panic!("stage '{}' not found in pipeline", name))
    }

    /// Register a converter after the existing ones.
    pub fn add_converter<C: Converter + 'static>(&mut self, converter: C) -> &mut Self {
        self.converters.push(Box::new(converter));
        self
    }

    /// Converters in registration order.
    pub fn converters(&self) -> &[Box<dyn Converter>] {
        &self.converters
    }

    /// Run every stage over the site, in order.
    ///
    /// Stops at the first failing stage and returns its error unchanged.
    pub fn run(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        for stage in &self.stages {
            log::debug!("running stage '{}'", stage.name());
            stage.process(site, ctx)?;
        }
        Ok(())
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::testing::{build_time, site};
    use super::*;
    use crate::build::render::Renderer;
    use crate::build::site::SourceFile;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records its name when run, optionally failing.
    struct Recorder {
        name: &'static str,
        log: Log,
        fail: bool,
    }

    impl Stage for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process(
            &self,
            site: &mut Site,
            _ctx: &mut PipelineContext,
        ) -> Result<(), PipelineError> {
            self.log.lock().unwrap().push(self.name.to_string());
            for page in site.pages_mut() {
                page.contents.push_str(self.name);
            }
            if self.fail {
                return Err(PipelineError::stage(self.name, "failed on purpose"));
            }
            Ok(())
        }
    }

    const DEFAULT_ORDER: [&str; 8] = [
        "build_date",
        "collections",
        "permalinks",
        "pagination",
        "excerpts",
        "in_place_templates",
        "convert",
        "layouts",
    ];

    fn recording_pipeline(names: &[&'static str], failing: Option<&str>, log: &Log) -> Pipeline {
        let mut pipeline = Pipeline::new();
        for &name in names {
            pipeline.add_stage(Recorder {
                name,
                log: log.clone(),
                fail: failing == Some(name),
            });
        }
        pipeline
    }

    fn run(pipeline: &Pipeline, site: &mut Site) -> Result<(), PipelineError> {
        let config = Config::default();
        let mut renderer = Renderer::empty();
        let mut ctx =
            PipelineContext::new(&config, &mut renderer, pipeline.converters(), build_time());
        pipeline.run(site, &mut ctx)
    }

    #[test]
    fn test_default_pipeline_stage_order() {
        let pipeline = Pipeline::default_pipeline(&Config::default()).unwrap();
        assert_eq!(pipeline.stage_names(), DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_default_pipeline_converter_order() {
        let pipeline = Pipeline::default_pipeline(&Config::default()).unwrap();
        let names: Vec<&str> = pipeline.converters().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["markdown", "stylesheet"]);
    }

    #[test]
    fn test_stages_run_in_order_over_whole_site() {
        let log = Log::default();
        let pipeline = recording_pipeline(&DEFAULT_ORDER, None, &log);
        let mut site = site(vec![SourceFile::new("a.md", ""), SourceFile::new("b.md", "")]);

        run(&pipeline, &mut site).unwrap();

        assert_eq!(*log.lock().unwrap(), DEFAULT_ORDER.to_vec());
        // Every page saw every stage, in order
        let expected = DEFAULT_ORDER.concat();
        for page in site.pages() {
            assert_eq!(page.contents, expected);
        }
    }

    #[test]
    fn test_first_failure_stops_the_pipeline() {
        let log = Log::default();
        let pipeline = recording_pipeline(&DEFAULT_ORDER, Some("pagination"), &log);
        let mut site = site(vec![SourceFile::new("a.md", "")]);

        let err = run(&pipeline, &mut site).unwrap_err();

        assert!(matches!(err, PipelineError::Stage { ref stage, .. } if stage == "pagination"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["build_date", "collections", "permalinks", "pagination"]
        );
        // Mutations made before the failure are kept
        assert_eq!(
            site.pages().next().unwrap().contents,
            "build_datecollectionspermalinkspagination"
        );
    }

    #[test]
    fn test_insert_before_and_after() {
        let log = Log::default();
        let mut pipeline = recording_pipeline(&["a", "c"], None, &log);
        pipeline.insert_before(
            "c",
            Recorder {
                name: "b",
                log: log.clone(),
                fail: false,
            },
        );
        pipeline.insert_after(
            "c",
            Recorder {
                name: "d",
                log: log.clone(),
                fail: false,
            },
        );

        assert_eq!(pipeline.stage_names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    #[should_panic(expected = "stage 'missing' not found")]
    fn test_insert_unknown_stage_panics() {
        let log = Log::default();
        let mut pipeline = recording_pipeline(&["a"], None, &log);
        pipeline.insert_after(
            "missing",
            Recorder {
                name: "b",
                log,
                fail: false,
            },
        );
    }
}
