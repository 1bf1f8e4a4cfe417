//! Build date stage.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::build::paths::split_date_prefix;
use crate::build::pipeline::{PipelineContext, PipelineError, RenderError, Stage};
use crate::build::site::{Site, SourceFile};

/// Stamps the site with the build time and resolves each page's date.
///
/// Dates come from the `date` front matter key, or from a `YYYY-MM-DD-`
/// prefix on the file name. Pages dated after the build time are not
/// written unless `site.future` is set.
pub struct BuildDateStage;

impl Stage for BuildDateStage {
    fn name(&self) -> &'static str {
        "build_date"
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        site.time = Some(ctx.build_time);

        for page in site.pages_mut() {
            page.date = page_date(page)?;

            let in_future = page.date.is_some_and(|date| date > ctx.build_time);
            if in_future && !ctx.config.site.future {
                log::debug!(
                    "{} is dated in the future, not publishing",
                    page.path().display()
                );
                page.destination_path = None;
            }
        }

        Ok(())
    }
}

fn page_date(page: &SourceFile) -> Result<Option<NaiveDateTime>, RenderError> {
    if let Some(value) = &page.front_matter.date {
        return parse_date(value).map(Some).ok_or_else(|| {
            RenderError::new(page.path(), format!("invalid date '{value}'"))
                .at_line(page.line_of("date"))
        });
    }

    let stem = page
        .path()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    Ok(split_date_prefix(stem)
        .0
        .and_then(|date| date.and_hms_opt(0, 0, 0)))
}

/// Parse a front matter date.
///
/// Accepts `2024-03-01`, `2024-03-01 09:30`, `2024-03-01 09:30:15` and
/// RFC 3339 timestamps (converted to their local wall time).
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}
