//! Pipeline error types.

use std::path::{Path, PathBuf};

/// Boxed underlying cause carried by a [`RenderError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure attributable to a specific source file.
///
/// This is a reporting type: once constructed it travels unchanged to the
/// caller of the build, which prints `path[:line]: cause`.
#[derive(thiserror::Error, Debug)]
#[error("{}: {source}", location(.file_path, .line_number))]
pub struct RenderError {
    /// Source-relative path of the file that failed
    pub file_path: PathBuf,
    /// 1-based line within the file, when known
    pub line_number: Option<usize>,
    /// The underlying cause
    pub source: BoxError,
}

impl RenderError {
    /// Wrap a cause for the given file, without line information.
    pub fn new(file_path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self {
            file_path: file_path.into(),
            line_number: None,
            source: source.into(),
        }
    }

    /// Attach a line number, if one is known.
    pub fn at_line(mut self, line_number: Option<usize>) -> Self {
        self.line_number = line_number;
        self
    }
}

fn location(file_path: &Path, line_number: &Option<usize>) -> String {
    match line_number {
        Some(line) => format!("{}:{}", file_path.display(), line),
        None => file_path.display().to_string(),
    }
}

/// Errors that can occur during pipeline processing.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A failure tied to one source file; surfaced to the caller as-is.
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// The file-level error, if this failure has one.
    #[cfg(test)]
    pub fn as_render(&self) -> Option<&RenderError> {
        match self {
            PipelineError::Render(err) => Some(err),
            PipelineError::Stage { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display_without_line() {
        let err = RenderError::new("posts/a.md", "boom");
        assert_eq!(err.to_string(), "posts/a.md: boom");
        assert_eq!(err.line_number, None);
    }

    #[test]
    fn test_render_error_display_with_line() {
        let err = RenderError::new("posts/a.md", "bad date").at_line(Some(4));
        assert_eq!(err.to_string(), "posts/a.md:4: bad date");
    }

    #[test]
    fn test_render_error_keeps_source() {
        let io = std::io::Error::other("disk");
        let err = RenderError::new("a.md", io);

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_pipeline_error_is_transparent() {
        let err: PipelineError = RenderError::new("a.md", "boom").into();
        assert_eq!(err.to_string(), "a.md: boom");
        assert!(err.as_render().is_some());
        assert!(PipelineError::stage("x", "y").as_render().is_none());
    }
}
