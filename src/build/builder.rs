use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::config::{Config, DEFAULT_CONFIG_FILE};

use super::loader::{LoadError, SiteLoader};
use super::markdown::MarkdownError;
use super::pipeline::{Pipeline, PipelineContext, PipelineError};
use super::render::{Renderer, TemplateError};
use super::writer::{SiteWriter, WriteError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("markdown error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub pages: usize,
    pub static_files: usize,
    /// Pages held back (unpublished or dated in the future)
    pub skipped: usize,
}

pub struct Builder {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
    /// Config file to keep out of the site
    config_file: PathBuf,
}

impl Builder {
    pub fn new(config: Config, base_path: PathBuf) -> Self {
        let config_file = base_path.join(DEFAULT_CONFIG_FILE);
        Self {
            config,
            base_path,
            config_file,
        }
    }

    /// Use a config file other than `kiln.yaml` in the base path.
    pub fn with_config_file(mut self, config_file: &Path) -> Self {
        self.config_file = config_file.to_path_buf();
        self
    }

    /// Build the site, stamping it with the current local time.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        self.build_at(Local::now().naive_local())
    }

    /// Build the site as of `build_time`.
    ///
    /// Nothing is written unless every pipeline stage succeeds.
    pub fn build_at(&self, build_time: NaiveDateTime) -> Result<BuildResult, BuildError> {
        let source_dir = self.config.source_dir(&self.base_path);
        let output_dir = self.config.output_dir(&self.base_path);

        // Step 1: Load the site
        let mut site = SiteLoader::new(&source_dir)
            .skip_path(&output_dir)
            .skip_path(&self.config_file)
            .exclude(&self.config.site.exclude)
            .load()?;
        println!(
            "Found {} page(s) and {} static file(s)",
            site.page_count(),
            site.static_count()
        );

        // Step 2: Load layouts
        let mut renderer = Renderer::new(&source_dir.join(&self.config.site.layouts))?;

        // Step 3: Run the pipeline
        let pipeline = Pipeline::default_pipeline(&self.config)?;
        let mut ctx =
            PipelineContext::new(&self.config, &mut renderer, pipeline.converters(), build_time);
        pipeline.run(&mut site, &mut ctx)?;
        log::info!("pipeline finished ({} stages)", pipeline.stage_names().len());

        // Step 4: Write the output
        let summary = SiteWriter::new(&output_dir).write(&site)?;

        let display_output = output_dir.canonicalize().unwrap_or(output_dir.clone());
        println!(
            "Wrote {} file(s) to {}",
            summary.pages + summary.static_files,
            display_output.display()
        );

        Ok(BuildResult {
            output_dir,
            pages: summary.pages,
            static_files: summary.static_files,
            skipped: summary.skipped,
        })
    }
}
