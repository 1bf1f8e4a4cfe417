//! Collection stage.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Component;

use crate::build::pipeline::{PipelineContext, PipelineError, Stage};
use crate::build::site::{Site, SourceFile};

/// Groups pages into named collections.
///
/// A page joins the collection named by its `collection` front matter key,
/// or the configured collection matching its top-level directory
/// (`posts/hello.md` joins `posts`). Unpublished pages are left out.
pub struct CollectionStage;

impl Stage for CollectionStage {
    fn name(&self) -> &'static str {
        "collections"
    }

    fn process(&self, site: &mut Site, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let configured = &ctx.config.site.collections;
        let mut collections: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (index, file) in site.files.iter_mut().enumerate() {
            let Some(page) = file.as_page_mut() else {
                continue;
            };
            if page.destination_path.is_none() || !page.front_matter.is_published() {
                continue;
            }

            let name = match &page.front_matter.collection {
                Some(name) => Some(name.clone()),
                None => top_level_dir(page).filter(|dir| configured.contains(dir)),
            };
            if let Some(name) = name {
                page.collection = Some(name.clone());
                collections.entry(name).or_default().push(index);
            }
        }

        for (name, indices) in &mut collections {
            indices.sort_by(|&a, &b| newest_first(site, a, b));
            log::debug!("collection '{}' has {} page(s)", name, indices.len());
        }
        site.collections = collections;

        Ok(())
    }
}

fn top_level_dir(page: &SourceFile) -> Option<String> {
    let mut components = page.path().components();
    let first = components.next()?;
    // A file directly in the source root has no collection directory
    components.next()?;
    match first {
        Component::Normal(name) => name.to_str().map(str::to_string),
        _ => None,
    }
}

fn newest_first(site: &Site, a: usize, b: usize) -> Ordering {
    let (Some(a), Some(b)) = (site.page(a), site.page(b)) else {
        return Ordering::Equal;
    };
    match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.path().cmp(b.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::pipeline::stages::BuildDateStage;
    use crate::build::pipeline::testing::{page, run_stage, site};
    use crate::config::Config;

    fn collect(site: &mut Site, config: &Config) {
        run_stage(&BuildDateStage, site, config).unwrap();
        run_stage(&CollectionStage, site, config).unwrap();
    }

    fn paths(site: &Site, collection: &str) -> Vec<String> {
        site.collections[collection]
            .iter()
            .map(|&i| site.page(i).unwrap().path().display().to_string())
            .collect()
    }

    #[test]
    fn test_groups_by_top_level_directory() {
        let mut site = site(vec![
            SourceFile::new("about.md", ""),
            SourceFile::new("posts/2024-01-01-first.md", ""),
            SourceFile::new("notes/idea.md", ""),
        ]);
        collect(&mut site, &Config::default());

        assert_eq!(site.collections.len(), 1);
        assert_eq!(paths(&site, "posts"), vec!["posts/2024-01-01-first.md"]);
        assert_eq!(
            site.page(1).unwrap().collection.as_deref(),
            Some("posts")
        );
        assert_eq!(site.page(0).unwrap().collection, None);
        assert_eq!(site.page(2).unwrap().collection, None);
    }

    #[test]
    fn test_front_matter_collection() {
        let mut site = site(vec![page("talks/rustconf.md", "collection: talks", "")]);
        collect(&mut site, &Config::default());

        assert_eq!(paths(&site, "talks"), vec!["talks/rustconf.md"]);
    }

    #[test]
    fn test_orders_newest_first_undated_last() {
        let mut site = site(vec![
            SourceFile::new("posts/2024-01-01-old.md", ""),
            SourceFile::new("posts/undated.md", ""),
            SourceFile::new("posts/2024-05-01-new.md", ""),
            SourceFile::new("posts/2024-03-01-b.md", ""),
            page("posts/a.md", "date: 2024-03-01", ""),
        ]);
        collect(&mut site, &Config::default());

        assert_eq!(
            paths(&site, "posts"),
            vec![
                "posts/2024-05-01-new.md",
                "posts/2024-03-01-b.md",
                "posts/a.md",
                "posts/2024-01-01-old.md",
                "posts/undated.md",
            ]
        );
    }

    #[test]
    fn test_skips_drafts() {
        let mut site = site(vec![
            SourceFile::new("posts/2024-05-01-hello.md", ""),
            page("posts/2024-05-02-secret.md", "published: false", ""),
        ]);
        collect(&mut site, &Config::default());

        assert_eq!(paths(&site, "posts"), vec!["posts/2024-05-01-hello.md"]);
        assert_eq!(site.page(1).unwrap().collection, None);
    }

    #[test]
    fn test_skips_future_pages() {
        let mut site = site(vec![
            SourceFile::new("posts/2024-01-01-now.md", ""),
            SourceFile::new("posts/2030-01-01-later.md", ""),
        ]);
        collect(&mut site, &Config::default());

        assert_eq!(paths(&site, "posts"), vec!["posts/2024-01-01-now.md"]);
        assert_eq!(site.page(1).unwrap().collection, None);
    }
}
