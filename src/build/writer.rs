use std::path::{Path, PathBuf};

use super::site::{Site, SiteFile};

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// What a write produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub pages: usize,
    pub static_files: usize,
    /// Pages without a destination (unpublished, future-dated)
    pub skipped: usize,
}

/// Writes a processed site to the output directory.
pub struct SiteWriter {
    output_dir: PathBuf,
}

impl SiteWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write every page with a destination and copy every static file.
    pub fn write(&self, site: &Site) -> Result<WriteSummary, WriteError> {
        let mut summary = WriteSummary::default();

        for file in &site.files {
            match file {
                SiteFile::Page(page) => {
                    let Some(destination) = &page.destination_path else {
                        log::debug!("not writing {}", page.path().display());
                        summary.skipped += 1;
                        continue;
                    };
                    let output_path = self.output_dir.join(destination);
                    create_parent(&output_path)?;
                    std::fs::write(&output_path, &page.contents).map_err(|source| {
                        WriteError::Write {
                            path: output_path.clone(),
                            source,
                        }
                    })?;
                    summary.pages += 1;
                }
                SiteFile::Static(file) => {
                    let input_path = site.source_dir.join(&file.path);
                    let output_path = self.output_dir.join(&file.destination_path);
                    create_parent(&output_path)?;
                    std::fs::copy(&input_path, &output_path).map_err(|source| {
                        WriteError::Copy {
                            from: input_path.clone(),
                            to: output_path.clone(),
                            source,
                        }
                    })?;
                    summary.static_files += 1;
                }
            }
        }

        Ok(summary)
    }
}

fn create_parent(path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::site::{SourceFile, StaticFile};

    #[test]
    fn test_writes_pages_and_copies_static_files() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join("img")).unwrap();
        std::fs::write(source.path().join("img/logo.svg"), "<svg/>").unwrap();

        let mut page = SourceFile::new("about.md", "<p>About</p>");
        page.destination_path = Some(PathBuf::from("about/index.html"));
        let mut draft = SourceFile::new("draft.md", "nope");
        draft.destination_path = None;

        let site = Site::new(
            source.path().to_path_buf(),
            vec![
                SiteFile::Page(page),
                SiteFile::Page(draft),
                SiteFile::Static(StaticFile::new(PathBuf::from("img/logo.svg"))),
            ],
        );

        let summary = SiteWriter::new(output.path()).write(&site).unwrap();

        assert_eq!(
            summary,
            WriteSummary {
                pages: 1,
                static_files: 1,
                skipped: 1,
            }
        );
        assert_eq!(
            std::fs::read_to_string(output.path().join("about/index.html")).unwrap(),
            "<p>About</p>"
        );
        assert_eq!(
            std::fs::read_to_string(output.path().join("img/logo.svg")).unwrap(),
            "<svg/>"
        );
        assert!(!output.path().join("draft.md").exists());
    }

    #[test]
    fn test_missing_static_source() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let site = Site::new(
            source.path().to_path_buf(),
            vec![SiteFile::Static(StaticFile::new(PathBuf::from("gone.png")))],
        );

        let result = SiteWriter::new(output.path()).write(&site);
        assert!(matches!(result, Err(WriteError::Copy { .. })));
    }
}
