// crates/app/src/invalidate.rs

//! Cache invalidation after successful writes.
//!
//! Every path whose cached rendering could show stale content is reported
//! to the injected invalidator. Best-effort by contract: the write already
//! succeeded, so an invalidation failure is logged and never rolled back.

use std::collections::BTreeSet;

use domain::doc::{PostDocument, SiteContentKey};
use tracing::info;

/// One invalidation target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Target {
    /// A concrete rendered path, e.g. `/blog/category/ai`.
    Path(String),
    /// Every page: footer/general settings feed the global layout, and
    /// enumerating pages here would race page creation.
    AllPages,
}

impl Target {
    pub fn path(p: impl Into<String>) -> Self {
        Target::Path(p.into())
    }
}

/// Sink for invalidation requests, injected at startup. Implementations
/// must not fail the caller; report trouble through their own logging.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, targets: Vec<Target>);
}

/// Default sink: records the decision in the log. Stands in wherever no
/// external cache layer is wired up.
#[derive(Debug, Default, Clone)]
pub struct LoggingInvalidator;

impl CacheInvalidator for LoggingInvalidator {
    fn invalidate(&self, targets: Vec<Target>) {
        for target in targets {
            match target {
                Target::Path(p) => info!(path = %p, "invalidate cached path"),
                Target::AllPages => info!("invalidate every cached page"),
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule table
// ─────────────────────────────────────────────────────────────────────────────

/// Page update (slug S): `/S` and the page-list view.
pub fn page_targets(slug: &str) -> Vec<Target> {
    vec![
        Target::path(format!("/{slug}")),
        Target::path("/admin/pages"),
    ]
}

pub fn site_content_targets(key: SiteContentKey) -> Vec<Target> {
    match key {
        SiteContentKey::Homepage => vec![Target::path("/")],
        // Footer and general settings feed every page's layout.
        SiteContentKey::Footer | SiteContentKey::General => vec![Target::AllPages],
        SiteContentKey::ContactInfo => vec![Target::path("/contact")],
    }
}

fn post_paths(post: &PostDocument, out: &mut BTreeSet<Target>) {
    out.insert(Target::path("/blog"));
    out.insert(Target::path(format!("/blog/{}", post.id)));
    out.insert(Target::path(format!("/blog/category/{}", post.category)));
    for tag in &post.tags {
        out.insert(Target::path(format!("/blog/tag/{tag}")));
    }
}

/// Post create: paths derived from the new document alone.
pub fn post_create_targets(post: &PostDocument) -> Vec<Target> {
    let mut set = BTreeSet::new();
    post_paths(post, &mut set);
    set.into_iter().collect()
}

/// Post update: new paths plus the old slug/category/tag paths when they
/// changed, so stale renderings of the previous location clear too.
pub fn post_update_targets(new: &PostDocument, old: &PostDocument) -> Vec<Target> {
    let mut set = BTreeSet::new();
    post_paths(new, &mut set);
    post_paths(old, &mut set);
    set.into_iter().collect()
}

/// Post delete: the same set as an update, computed from the pre-delete
/// document.
pub fn post_delete_targets(pre_delete: &PostDocument) -> Vec<Target> {
    post_create_targets(pre_delete)
}

/// Plan create/update/delete: admin plan list, homepage, order page.
pub fn plan_targets() -> Vec<Target> {
    vec![
        Target::path("/admin/plans"),
        Target::path("/"),
        Target::path("/order"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, category: &str, tags: &[&str]) -> PostDocument {
        PostDocument {
            id: slug.into(),
            title: "t".into(),
            excerpt: String::new(),
            body: "b".into(),
            category: category.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn paths(targets: &[Target]) -> Vec<&str> {
        targets
            .iter()
            .map(|t| match t {
                Target::Path(p) => p.as_str(),
                Target::AllPages => "*",
            })
            .collect()
    }

    #[test]
    fn page_update_hits_page_and_list_view() {
        assert_eq!(paths(&page_targets("about")), vec!["/about", "/admin/pages"]);
    }

    #[test]
    fn footer_and_general_invalidate_everything() {
        assert_eq!(
            site_content_targets(SiteContentKey::Footer),
            vec![Target::AllPages]
        );
        assert_eq!(
            site_content_targets(SiteContentKey::General),
            vec![Target::AllPages]
        );
        assert_eq!(
            site_content_targets(SiteContentKey::Homepage),
            vec![Target::path("/")]
        );
    }

    #[test]
    fn post_create_covers_list_slug_category_and_tags() {
        let targets = post_create_targets(&post("why-nvme", "guides", &["vps", "storage"]));
        let got = paths(&targets);
        for expected in [
            "/blog",
            "/blog/why-nvme",
            "/blog/category/guides",
            "/blog/tag/vps",
            "/blog/tag/storage",
        ] {
            assert!(got.contains(&expected), "missing {expected} in {got:?}");
        }
    }

    #[test]
    fn category_change_invalidates_old_and_new() {
        let old = post("intro", "ai", &[]);
        let new = post("intro", "no-code", &[]);
        let targets = post_update_targets(&new, &old);
        let got = paths(&targets);
        assert!(got.contains(&"/blog/category/ai"));
        assert!(got.contains(&"/blog/category/no-code"));
    }

    #[test]
    fn slug_change_invalidates_both_slugs_without_duplicates() {
        let old = post("old-name", "guides", &["vps"]);
        let new = post("new-name", "guides", &["vps"]);
        let targets = post_update_targets(&new, &old);
        let got = paths(&targets);
        assert!(got.contains(&"/blog/old-name"));
        assert!(got.contains(&"/blog/new-name"));
        let unique: std::collections::BTreeSet<_> = got.iter().collect();
        assert_eq!(unique.len(), got.len());
    }

    #[test]
    fn delete_uses_the_pre_delete_document() {
        let doc = post("gone", "news", &["archive"]);
        assert_eq!(post_delete_targets(&doc), post_create_targets(&doc));
    }
}
