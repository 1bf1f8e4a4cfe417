//! Default pipeline stages.
//!
//! The standard site processing pipeline consists of:
//!
//! 1. **BuildDateStage** - Resolve publication dates, hold back future pages
//! 2. **CollectionStage** - Group pages into collections, newest first
//! 3. **PermalinkStage** - Compute output paths and urls
//! 4. **PaginationStage** - Split paginated pages over their collection
//! 5. **ExcerptStage** - Extract page excerpts
//! 6. **TemplateStage::in_place** - Process Tera syntax in page contents
//! 7. **ConvertStage** - Run the converters (Markdown, SCSS)
//! 8. **TemplateStage::using_template** - Wrap converted contents in layouts

mod collection;
mod convert;
mod date;
mod excerpt;
mod pagination;
mod permalink;
mod template;

pub use collection::CollectionStage;
pub use convert::ConvertStage;
pub use date::BuildDateStage;
pub use excerpt::ExcerptStage;
pub use pagination::PaginationStage;
pub use permalink::PermalinkStage;
pub use template::TemplateStage;
