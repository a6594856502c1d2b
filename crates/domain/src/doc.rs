// crates/domain/src/doc.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::block::ContentBlock;

// ─────────────────────────────────────────────────────────────────────────────
// Collection documents
// ─────────────────────────────────────────────────────────────────────────────

/// A marketing page. `id` is the slug and is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    pub id: String,
    pub title: String,
    pub meta_description: String,
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageDocument {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            meta_description: String::new(),
            blocks: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_meta_description(mut self, meta: impl Into<String>) -> Self {
        self.meta_description = meta.into();
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<ContentBlock>) -> Self {
        self.blocks = blocks;
        self
    }
}

/// Singleton documents in the `site_content` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteContentKey {
    Homepage,
    Footer,
    ContactInfo,
    General,
}

impl SiteContentKey {
    pub fn id(&self) -> &'static str {
        match self {
            SiteContentKey::Homepage => "homepage",
            SiteContentKey::Footer => "footer",
            SiteContentKey::ContactInfo => "contact_info",
            SiteContentKey::General => "general",
        }
    }
}

/// Homepage/footer/contact/general content: same block-list shape as a page,
/// keyed by a fixed id instead of a slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContentDocument {
    pub id: String,
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SiteContentDocument {
    pub fn new(key: SiteContentKey) -> Self {
        Self {
            id: key.id().to_owned(),
            blocks: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<ContentBlock>) -> Self {
        self.blocks = blocks;
        self
    }
}

/// A blog post. `id` is the slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Markdown source.
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A VPS plan row (`vps_plans` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    pub id: String,
    pub name: String,
    /// Monthly price in cents; avoids float drift on money.
    pub price_monthly: u64,
    pub cpu_cores: u32,
    pub ram_mb: u32,
    pub storage_gb: u32,
    pub features: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A blog category row (`categories` collection). `id` is the slug used in
/// `/blog/category/{id}` paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    pub id: String,
    pub name: String,
}

/// One entry in the `navigation` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub href: String,
    pub order: i64,
}
