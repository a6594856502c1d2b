// crates/store/src/adapter.rs

//! Storage-agnostic document access.
//!
//! The rest of the system consumes exactly this trait; actual storage
//! (in-memory here, a hosted document database in production) is injected at
//! startup. Writes stamp `updatedAt` on every call and `createdAt` once.

use async_trait::async_trait;
use serde_json::{Map, Value as Json};

use crate::Result;

/// The known collections. A closed set so call sites cannot typo a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Pages,
    Posts,
    Categories,
    SiteContent,
    Navigation,
    VpsPlans,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Pages => "pages",
            Collection::Posts => "posts",
            Collection::Categories => "categories",
            Collection::SiteContent => "site_content",
            Collection::Navigation => "navigation",
            Collection::VpsPlans => "vps_plans",
        }
    }
}

/// Sort order for `query`, applied to a top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Unordered,
    Asc(String),
    Desc(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` when absent. Absence is not an error on
    /// the read path; `resolve` substitutes defaults above this layer.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Json>>;

    /// List documents matching a field-equality filter, ordered.
    async fn query(
        &self,
        collection: Collection,
        filter: Option<(&str, &Json)>,
        order: Order,
    ) -> Result<Vec<Json>>;

    /// Full overwrite. Creates the document when absent. Stamps `updatedAt`
    /// always; `createdAt` only on first write and never thereafter.
    async fn set(&self, collection: Collection, id: &str, doc: Json) -> Result<()>;

    /// Shallow merge of scalar metadata fields into an existing document.
    /// Never used for block lists; fails with `NotFound` when absent.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Json>,
    ) -> Result<()>;

    /// Remove a document (posts and plans only). `NotFound` when absent.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}
