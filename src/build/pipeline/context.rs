//! Pipeline context for sharing state across stages.

use chrono::NaiveDateTime;

use crate::build::convert::Converter;
use crate::build::render::Renderer;
use crate::config::Config;

/// Shared context for pipeline stages.
///
/// Holds the build-wide resources stages read from. The site itself is not
/// in here: every stage receives it explicitly as `&mut Site`.
pub struct PipelineContext<'a> {
    /// Site configuration
    pub config: &'a Config,

    /// Template renderer (needs mutable access for in-place rendering)
    pub renderer: &'a mut Renderer,

    /// Converters in registration order, owned by the pipeline
    pub converters: &'a [Box<dyn Converter>],

    /// Time the build started; pages dated later are unpublished
    pub build_time: NaiveDateTime,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        config: &'a Config,
        renderer: &'a mut Renderer,
        converters: &'a [Box<dyn Converter>],
        build_time: NaiveDateTime,
    ) -> Self {
        Self {
            config,
            renderer,
            converters,
            build_time,
        }
    }
}
