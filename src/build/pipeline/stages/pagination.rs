//! Pagination stage.

use crate::build::paths::url_to_destination;
use crate::build::pipeline::{PipelineContext, PipelineError, RenderError, Stage};
use crate::build::site::{Paginator, Site, SiteFile, SourceFile};

/// Splits pages with `paginate: <collection>` over their collection.
///
/// The page itself becomes page 1. Pages 2..N are clones appended to the
/// site, served under the configured pagination path (`page/:num` gives
/// `/blog/page/2/`). Every page gets a [`Paginator`] describing its slice.
pub struct PaginationStage;

impl Stage for PaginationStage {
    fn name(&self) -> &'static str {
        "pagination"
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let mut extra_pages = Vec::new();

        for index in 0..site.files.len() {
            let Some(page) = site.page(index) else {
                continue;
            };
            let Some(collection) = &page.front_matter.paginate else {
                continue;
            };
            if page.destination_path.is_none() {
                continue;
            }

            let per_page = page
                .front_matter
                .per_page
                .unwrap_or(ctx.config.pagination.per_page);
            if per_page == 0 {
                return Err(PipelineError::stage(
                    self.name(),
                    format!("{}: per_page must be at least 1", page.path().display()),
                ));
            }

            let items = site.collections.get(collection).ok_or_else(|| {
                RenderError::new(page.path(), format!("unknown collection '{collection}'"))
                    .at_line(page.line_of("paginate"))
            })?;

            let total_pages = items.len().div_ceil(per_page).max(1);
            let urls: Vec<String> = (1..=total_pages)
                .map(|num| page_url(&page.url, &ctx.config.pagination.path, num))
                .collect();

            log::debug!(
                "paginating {} over '{}': {} page(s)",
                page.path().display(),
                collection,
                total_pages
            );

            let mut pages = Vec::with_capacity(total_pages);
            for (offset, chunk) in chunk_or_empty(items, per_page).enumerate() {
                let paginator = Paginator {
                    page: offset + 1,
                    per_page,
                    total_pages,
                    total_items: items.len(),
                    items: chunk.to_vec(),
                    previous_url: offset.checked_sub(1).map(|i| urls[i].clone()),
                    next_url: urls.get(offset + 1).cloned(),
                };
                pages.push(paginator);
            }

            let mut paginators = pages.into_iter();
            let first = paginators.next();
            for (offset, paginator) in paginators.enumerate() {
                extra_pages.push(paginated_copy(page, &urls[offset + 1], paginator));
            }
            if let Some(page) = site.files[index].as_page_mut() {
                page.paginator = first;
            }
        }

        site.files
            .extend(extra_pages.into_iter().map(SiteFile::Page));
        Ok(())
    }
}

/// Url of page `num` of a listing served at `base`.
fn page_url(base: &str, path: &str, num: usize) -> String {
    if num == 1 {
        return base.to_string();
    }
    let dir = match base.rfind('/') {
        Some(pos) => &base[..=pos],
        None => "/",
    };
    let segment = path.trim_matches('/').replace(":num", &num.to_string());
    format!("{dir}{segment}/")
}

/// Chunks of `per_page` items; a single empty chunk when there are no items.
fn chunk_or_empty(items: &[usize], per_page: usize) -> impl Iterator<Item = &[usize]> {
    let empty: &[usize] = &[];
    let single = items.is_empty().then_some(empty);
    single.into_iter().chain(items.chunks(per_page))
}

fn paginated_copy(page: &SourceFile, url: &str, paginator: Paginator) -> SourceFile {
    let mut copy = page.clone();
    copy.destination_path = Some(url_to_destination(url, page.extension()));
    copy.url = url.to_string();
    copy.paginator = Some(paginator);
    copy
}
