use std::io::Read;
use std::path::{Path, PathBuf};

use super::front_matter::parse_front_matter;
use super::pipeline::RenderError;
use super::site::{Site, SiteFile, SourceFile, StaticFile};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("source path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("source path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A page whose front matter does not parse.
    #[error(transparent)]
    FrontMatter(#[from] RenderError),
}

// =============================================================================
// Loader
// =============================================================================

/// Reads a source directory into a [`Site`].
///
/// Hidden entries and entries starting with `_` (layouts, drafts) are
/// skipped, as are configured paths (output directory, config file) and
/// excluded names.
pub struct SiteLoader {
    source_dir: PathBuf,
    /// Source-relative paths to leave out
    skip: Vec<PathBuf>,
    /// File or directory names to leave out, wherever they appear
    exclude: Vec<String>,
}

impl SiteLoader {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            skip: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Leave out a path, if it lies inside the source directory.
    pub fn skip_path(mut self, path: &Path) -> Self {
        if let Ok(relative) = path.strip_prefix(&self.source_dir) {
            if !relative.as_os_str().is_empty() {
                self.skip.push(relative.to_path_buf());
            }
        }
        self
    }

    /// Leave out every entry with one of these names.
    pub fn exclude(mut self, names: &[String]) -> Self {
        self.exclude.extend(names.iter().cloned());
        self
    }

    /// Walk the source directory and classify every file.
    ///
    /// Files are returned sorted by path.
    pub fn load(&self) -> Result<Site, LoadError> {
        if !self.source_dir.exists() {
            return Err(LoadError::PathNotFound(self.source_dir.clone()));
        }
        if !self.source_dir.is_dir() {
            return Err(LoadError::NotADirectory(self.source_dir.clone()));
        }

        let mut files = Vec::new();
        self.walk_directory(&self.source_dir, Path::new(""), &mut files)?;
        files.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(Site::new(self.source_dir.clone(), files))
    }

    fn walk_directory(
        &self,
        dir: &Path,
        relative_path: &Path,
        files: &mut Vec<SiteFile>,
    ) -> Result<(), LoadError> {
        let entries = std::fs::read_dir(dir).map_err(|e| LoadError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| LoadError::ReadEntry {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let path = entry.path();
            let file_name = entry.file_name();
            let file_name_str = file_name.to_string_lossy();
            let item_relative_path = relative_path.join(&file_name);

            if file_name_str.starts_with(['.', '_'])
                || self.exclude.iter().any(|name| *name == *file_name_str)
                || self.skip.contains(&item_relative_path)
            {
                log::debug!("skipping {}", item_relative_path.display());
                continue;
            }

            if path.is_dir() {
                self.walk_directory(&path, &item_relative_path, files)?;
            } else if path.is_file() {
                files.push(classify_file(&path, item_relative_path)?);
            }
        }

        Ok(())
    }
}

/// A file is a page when it is UTF-8 text opening with a front matter block.
fn classify_file(full_path: &Path, relative_path: PathBuf) -> Result<SiteFile, LoadError> {
    let read_error = |source| LoadError::ReadFile {
        path: full_path.to_path_buf(),
        source,
    };

    if !starts_with_delimiter(full_path).map_err(read_error)? {
        return Ok(SiteFile::Static(StaticFile::new(relative_path)));
    }

    let bytes = std::fs::read(full_path).map_err(read_error)?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(SiteFile::Static(StaticFile::new(relative_path)));
    };

    match parse_front_matter(&text) {
        Ok(Some(parsed)) => Ok(SiteFile::Page(SourceFile::from_parsed(relative_path, parsed))),
        Ok(None) => Ok(SiteFile::Static(StaticFile::new(relative_path))),
        Err(e) => {
            let line = e.line;
            Err(RenderError::new(relative_path, e).at_line(line).into())
        }
    }
}

fn starts_with_delimiter(path: &Path) -> std::io::Result<bool> {
    let mut head = Vec::with_capacity(3);
    std::fs::File::open(path)?.take(3).read_to_end(&mut head)?;
    Ok(head == b"---")
}
