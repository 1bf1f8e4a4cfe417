use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::front_matter::{FrontMatter, ParsedContent};
use super::paths::split_date_prefix;
use crate::util::title_case;

// =============================================================================
// Site aggregate
// =============================================================================

/// Everything one build knows about the site.
///
/// Owned by a single build run and handed to each pipeline stage as
/// `&mut Site`; nothing is shared between builds.
#[derive(Debug, Default)]
pub struct Site {
    /// Directory the files were loaded from
    pub source_dir: PathBuf,
    /// Pages and static files, in load order
    pub files: Vec<SiteFile>,
    /// Collection name -> indices into `files`, newest first.
    ///
    /// Stages after the collection stage only append to `files`, so the
    /// indices stay valid for the rest of the build.
    pub collections: BTreeMap<String, Vec<usize>>,
    /// Build time, set by the build-date stage
    pub time: Option<NaiveDateTime>,
}

impl Site {
    pub fn new(source_dir: PathBuf, files: Vec<SiteFile>) -> Self {
        Self {
            source_dir,
            files,
            ..Self::default()
        }
    }

    /// Iterate over the pages, skipping static files.
    pub fn pages(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter_map(SiteFile::as_page)
    }

    /// Iterate mutably over the pages, skipping static files.
    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut SourceFile> {
        self.files.iter_mut().filter_map(SiteFile::as_page_mut)
    }

    /// Look up a page by its index in `files`.
    pub fn page(&self, index: usize) -> Option<&SourceFile> {
        self.files.get(index).and_then(SiteFile::as_page)
    }

    pub fn page_count(&self) -> usize {
        self.pages().count()
    }

    pub fn static_count(&self) -> usize {
        self.files.len() - self.page_count()
    }
}

/// A file discovered in the source directory.
#[derive(Debug, Clone)]
pub enum SiteFile {
    /// A file with front matter; its contents flow through the pipeline
    Page(SourceFile),
    /// A file without front matter, copied as-is
    Static(StaticFile),
}

impl SiteFile {
    /// Get the source-relative path.
    pub fn path(&self) -> &Path {
        match self {
            SiteFile::Page(page) => page.path(),
            SiteFile::Static(file) => &file.path,
        }
    }

    pub fn as_page(&self) -> Option<&SourceFile> {
        match self {
            SiteFile::Page(page) => Some(page),
            SiteFile::Static(_) => None,
        }
    }

    pub fn as_page_mut(&mut self) -> Option<&mut SourceFile> {
        match self {
            SiteFile::Page(page) => Some(page),
            SiteFile::Static(_) => None,
        }
    }
}

// =============================================================================
// Static files
// =============================================================================

/// A file without front matter (image, plain CSS, fonts...).
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// Path relative to the source directory
    pub path: PathBuf,
    /// Path relative to the output directory
    pub destination_path: PathBuf,
}

impl StaticFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            destination_path: path.clone(),
            path,
        }
    }
}

// =============================================================================
// Pages
// =============================================================================

/// One page flowing through the build pipeline.
///
/// `contents` starts as the body below the front matter and is rewritten in
/// place by the template and conversion stages. `destination_path` starts as
/// the source path (same extension) and is rewritten by the permalink stage
/// and the conversion pass; `None` means the page is not written.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    pub contents: String,
    pub destination_path: Option<PathBuf>,
    pub front_matter: FrontMatter,
    key_lines: HashMap<String, usize>,

    /// Publication date, set by the build-date stage
    pub date: Option<NaiveDateTime>,
    /// Collection membership, set by the collection stage
    pub collection: Option<String>,
    /// Public url, set by the permalink stage
    pub url: String,
    /// Source-format excerpt, set by the excerpt stage
    pub excerpt: Option<String>,
    /// Pagination state, set by the pagination stage
    pub paginator: Option<Paginator>,
}

impl SourceFile {
    /// Create a page without front matter.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            destination_path: Some(path.clone()),
            path,
            contents: contents.into(),
            front_matter: FrontMatter::default(),
            key_lines: HashMap::new(),
            date: None,
            collection: None,
            url: String::new(),
            excerpt: None,
            paginator: None,
        }
    }

    /// Create a page from a parsed file.
    pub fn from_parsed(path: impl Into<PathBuf>, parsed: ParsedContent) -> Self {
        let mut page = Self::new(path, parsed.content);
        page.front_matter = parsed.front_matter;
        page.key_lines = parsed.key_lines;
        page
    }

    /// The original, source-relative location. Never changes during a build.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension of the original path, without the dot.
    pub fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }

    /// 1-based line of a front matter key in the source file.
    pub fn line_of(&self, key: &str) -> Option<usize> {
        self.key_lines.get(key).copied()
    }

    /// File stem with any `YYYY-MM-DD-` prefix removed.
    pub fn slug(&self) -> &str {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        split_date_prefix(stem).1
    }

    /// Get the page title, falling back to the file name.
    pub fn title(&self) -> String {
        self.front_matter.title.clone().unwrap_or_else(|| {
            match self.slug() {
                "" => "Untitled".to_string(),
                slug => title_case(slug),
            }
        })
    }
}

/// Position of a page within a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Indices into `Site::files` shown on this page
    pub items: Vec<usize>,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}
