// crates/serve/src/resolve.rs

//! Request → content resolution.
//!
//! Per request: `Requested -> Resolving -> Found | Absent | StoreError`.
//! A found document is decoded leniently (unknown blocks become
//! placeholders); an absent one substitutes the whole hardcoded default;
//! a store failure surfaces to the caller. No partial state escapes.

use domain::block::StoredBlock;
use domain::doc::{PageDocument, SiteContentDocument, SiteContentKey};
use serde_json::Value as Json;
use store::{Collection, DocumentStore, StoreError};

use crate::defaults;

/// Where the resolved content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Stored,
    Default,
}

/// A read-only, render-ready snapshot of one page or settings document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub id: String,
    pub title: String,
    pub meta_description: String,
    pub blocks: Vec<StoredBlock>,
    pub origin: Origin,
}

impl ResolvedPage {
    fn from_page(doc: PageDocument, origin: Origin) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            meta_description: doc.meta_description,
            blocks: doc.blocks.into_iter().map(StoredBlock::Known).collect(),
            origin,
        }
    }

    fn from_site_content(doc: SiteContentDocument, origin: Origin) -> Self {
        Self {
            id: doc.id,
            title: String::new(),
            meta_description: String::new(),
            blocks: doc.blocks.into_iter().map(StoredBlock::Known).collect(),
            origin,
        }
    }

    /// Decode a stored JSON document without strict validation. Reads must
    /// not fail on data persisted by an older schema; unknown discriminants
    /// surface as placeholder blocks instead.
    fn from_stored(id: &str, doc: &Json) -> Self {
        let field = |name: &str| {
            doc.get(name)
                .and_then(Json::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        let blocks = doc
            .get("blocks")
            .and_then(Json::as_array)
            .map(|items| StoredBlock::from_list(items))
            .unwrap_or_default();
        Self {
            id: id.to_owned(),
            title: field("title"),
            meta_description: field("metaDescription"),
            blocks,
            origin: Origin::Stored,
        }
    }
}

/// Resolve a page slug: stored snapshot, or the whole hardcoded default.
#[tracing::instrument(skip_all, fields(slug = %slug))]
pub async fn resolve_page(
    store: &dyn DocumentStore,
    slug: &str,
) -> Result<ResolvedPage, StoreError> {
    match store.get(Collection::Pages, slug).await? {
        Some(doc) => Ok(ResolvedPage::from_stored(slug, &doc)),
        None => Ok(ResolvedPage::from_page(
            defaults::default_page(slug),
            Origin::Default,
        )),
    }
}

/// Resolve a singleton settings document by its fixed key.
#[tracing::instrument(skip_all, fields(key = key.id()))]
pub async fn resolve_site_content(
    store: &dyn DocumentStore,
    key: SiteContentKey,
) -> Result<ResolvedPage, StoreError> {
    match store.get(Collection::SiteContent, key.id()).await? {
        Some(doc) => Ok(ResolvedPage::from_stored(key.id(), &doc)),
        None => Ok(ResolvedPage::from_site_content(
            defaults::default_site_content(key),
            Origin::Default,
        )),
    }
}
