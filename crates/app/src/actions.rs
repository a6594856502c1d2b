// crates/app/src/actions.rs

//! Server actions: the write path.
//!
//! Every action runs validate → persist → invalidate within one request.
//! Validation failures stop before the store is touched and come back as
//! field-level errors for the editor. Persistence failures abort the action
//! with a generic user-facing message (full detail goes to the log, not the
//! response). Invalidation runs only after a successful write and is
//! fire-and-forget.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value as Json};
use tracing::error;
use uuid::Uuid;

use domain::doc::{PostDocument, SiteContentKey};
use domain::validate::{
    validate_page_document, validate_plan_document, validate_post_document, validate_site_content,
    FieldError, ValidationError,
};
use store::{Collection, DocumentStore, StoreError};

use crate::invalidate::{self, CacheInvalidator};

/// Save result surfaced to the editor UI.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl ActionOutcome {
    fn saved(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    fn invalid(err: ValidationError) -> Self {
        Self {
            ok: false,
            message: "Please fix the highlighted fields.".into(),
            field_errors: err.errors,
        }
    }

    fn rejected(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: "Please fix the highlighted fields.".into(),
            field_errors: vec![FieldError {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    /// Persistence failure: generic message out, full detail logged.
    fn failed(context: &str, err: &StoreError) -> Self {
        error!(context, %err, "persistence failure");
        Self {
            ok: false,
            message: "Saving failed. Please try again.".into(),
            field_errors: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct Actions {
    store: Arc<dyn DocumentStore>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl Actions {
    pub fn new(store: Arc<dyn DocumentStore>, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        Self { store, invalidator }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pages
    // ─────────────────────────────────────────────────────────────────────

    /// Create a page. The slug is fixed at creation and immutable after.
    #[tracing::instrument(skip_all)]
    pub async fn create_page(&self, input: Json) -> ActionOutcome {
        let doc = match validate_page_document(&input) {
            Ok(doc) => doc,
            Err(err) => return ActionOutcome::invalid(err),
        };

        match self.store.get(Collection::Pages, &doc.id).await {
            Ok(Some(_)) => {
                return ActionOutcome::rejected("id", "a page with this slug already exists")
            }
            Ok(None) => {}
            Err(err) => return ActionOutcome::failed("create_page", &err),
        }

        let wire = json!(doc);
        if let Err(err) = self.store.set(Collection::Pages, &doc.id, wire).await {
            return ActionOutcome::failed("create_page", &err);
        }
        self.invalidator.invalidate(invalidate::page_targets(&doc.id));
        ActionOutcome::saved("Page created.")
    }

    /// Replace a page's full ordered block list (plus title and meta).
    /// Last write wins; the submitted list overwrites wholesale.
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn update_page(&self, slug: &str, mut input: Json) -> ActionOutcome {
        // The slug comes from the route, never from the payload.
        if let Some(obj) = input.as_object_mut() {
            obj.insert("id".into(), json!(slug));
        }
        let doc = match validate_page_document(&input) {
            Ok(doc) => doc,
            Err(err) => return ActionOutcome::invalid(err),
        };

        if let Err(err) = self.store.set(Collection::Pages, slug, json!(doc)).await {
            return ActionOutcome::failed("update_page", &err);
        }
        self.invalidator.invalidate(invalidate::page_targets(slug));
        ActionOutcome::saved("Page saved.")
    }

    /// Partial-merge path for scalar metadata only; the block list is never
    /// touched through here.
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn update_page_meta(
        &self,
        slug: &str,
        title: Option<String>,
        meta_description: Option<String>,
    ) -> ActionOutcome {
        let mut fields = Map::new();
        if let Some(title) = title {
            if title.trim().is_empty() {
                return ActionOutcome::rejected("title", "must not be empty");
            }
            fields.insert("title".into(), json!(title));
        }
        if let Some(meta) = meta_description {
            fields.insert("metaDescription".into(), json!(meta));
        }
        if fields.is_empty() {
            return ActionOutcome::rejected("", "nothing to update");
        }

        match self.store.update(Collection::Pages, slug, fields).await {
            Ok(()) => {
                self.invalidator.invalidate(invalidate::page_targets(slug));
                ActionOutcome::saved("Page details saved.")
            }
            Err(err) if err.is_not_found() => ActionOutcome::rejected("id", "page not found"),
            Err(err) => ActionOutcome::failed("update_page_meta", &err),
        }
    }

    /// Fetch a page shaped for the editor: every feature card gets a fresh
    /// ephemeral `id` so the drag-and-drop list has stable keys. Validation
    /// strips the ids again on the way back in.
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn edit_page(&self, slug: &str) -> store::Result<Option<Json>> {
        let doc = self.store.get(Collection::Pages, slug).await?;
        Ok(doc.map(with_editor_ids))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Site content singletons
    // ─────────────────────────────────────────────────────────────────────

    #[tracing::instrument(skip_all, fields(key = key.id()))]
    pub async fn edit_site_content(&self, key: SiteContentKey) -> store::Result<Option<Json>> {
        let doc = self.store.get(Collection::SiteContent, key.id()).await?;
        Ok(doc.map(with_editor_ids))
    }

    /// Save a singleton settings document (homepage enforces the
    /// three-feature-card rule).
    #[tracing::instrument(skip_all, fields(key = key.id()))]
    pub async fn update_site_content(&self, key: SiteContentKey, input: Json) -> ActionOutcome {
        let doc = match validate_site_content(key, &input) {
            Ok(doc) => doc,
            Err(err) => return ActionOutcome::invalid(err),
        };

        if let Err(err) = self
            .store
            .set(Collection::SiteContent, key.id(), json!(doc))
            .await
        {
            return ActionOutcome::failed("update_site_content", &err);
        }
        self.invalidator
            .invalidate(invalidate::site_content_targets(key));
        ActionOutcome::saved("Content saved.")
    }

    // ─────────────────────────────────────────────────────────────────────
    // Posts
    // ─────────────────────────────────────────────────────────────────────

    #[tracing::instrument(skip_all)]
    pub async fn create_post(&self, input: Json) -> ActionOutcome {
        let post = match validate_post_document(&input) {
            Ok(post) => post,
            Err(err) => return ActionOutcome::invalid(err),
        };

        match self.store.get(Collection::Posts, &post.id).await {
            Ok(Some(_)) => {
                return ActionOutcome::rejected("id", "a post with this slug already exists")
            }
            Ok(None) => {}
            Err(err) => return ActionOutcome::failed("create_post", &err),
        }

        if let Err(err) = self.store.set(Collection::Posts, &post.id, json!(post)).await {
            return ActionOutcome::failed("create_post", &err);
        }
        self.invalidator
            .invalidate(invalidate::post_create_targets(&post));
        ActionOutcome::saved("Post created.")
    }

    /// Update a post. Old slug/category/tag paths are invalidated alongside
    /// the new ones when they changed.
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn update_post(&self, slug: &str, input: Json) -> ActionOutcome {
        let post = match validate_post_document(&input) {
            Ok(post) => post,
            Err(err) => return ActionOutcome::invalid(err),
        };

        let old = match self.store.get(Collection::Posts, slug).await {
            Ok(Some(doc)) => match serde_json::from_value::<PostDocument>(doc) {
                Ok(old) => Some(old),
                // A malformed legacy row still allows the update; only the
                // old-path invalidation is lost.
                Err(_) => None,
            },
            Ok(None) => return ActionOutcome::rejected("id", "post not found"),
            Err(err) => return ActionOutcome::failed("update_post", &err),
        };

        if let Err(err) = self.store.set(Collection::Posts, &post.id, json!(post)).await {
            return ActionOutcome::failed("update_post", &err);
        }
        // Renamed slug: drop the old row so both slugs do not serve copies.
        if post.id != slug {
            if let Err(err) = self.store.delete(Collection::Posts, slug).await {
                if !err.is_not_found() {
                    return ActionOutcome::failed("update_post", &err);
                }
            }
        }

        let targets = match &old {
            Some(old) => invalidate::post_update_targets(&post, old),
            None => invalidate::post_create_targets(&post),
        };
        self.invalidator.invalidate(targets);
        ActionOutcome::saved("Post saved.")
    }

    /// Delete a post; the invalidation set comes from the pre-delete
    /// document.
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn delete_post(&self, slug: &str) -> ActionOutcome {
        let pre_delete = match self.store.get(Collection::Posts, slug).await {
            Ok(Some(doc)) => serde_json::from_value::<PostDocument>(doc).ok(),
            Ok(None) => return ActionOutcome::rejected("id", "post not found"),
            Err(err) => return ActionOutcome::failed("delete_post", &err),
        };

        if let Err(err) = self.store.delete(Collection::Posts, slug).await {
            return ActionOutcome::failed("delete_post", &err);
        }
        if let Some(pre_delete) = pre_delete {
            self.invalidator
                .invalidate(invalidate::post_delete_targets(&pre_delete));
        }
        ActionOutcome::saved("Post deleted.")
    }

    /// Store an uploaded image's URL on a post (the upload webhook returns
    /// `source_url`; this is the only field the core owns).
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn set_post_image(&self, slug: &str, source_url: &str) -> ActionOutcome {
        let mut fields = Map::new();
        fields.insert("imageUrl".into(), json!(source_url));
        match self.store.update(Collection::Posts, slug, fields).await {
            Ok(()) => {
                self.invalidator
                    .invalidate(vec![crate::invalidate::Target::path(format!(
                        "/blog/{slug}"
                    ))]);
                ActionOutcome::saved("Image attached.")
            }
            Err(err) if err.is_not_found() => ActionOutcome::rejected("id", "post not found"),
            Err(err) => ActionOutcome::failed("set_post_image", &err),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Plans
    // ─────────────────────────────────────────────────────────────────────

    #[tracing::instrument(skip_all)]
    pub async fn save_plan(&self, input: Json) -> ActionOutcome {
        let plan = match validate_plan_document(&input) {
            Ok(plan) => plan,
            Err(err) => return ActionOutcome::invalid(err),
        };

        if let Err(err) = self
            .store
            .set(Collection::VpsPlans, &plan.id, json!(plan))
            .await
        {
            return ActionOutcome::failed("save_plan", &err);
        }
        self.invalidator.invalidate(invalidate::plan_targets());
        ActionOutcome::saved("Plan saved.")
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn delete_plan(&self, id: &str) -> ActionOutcome {
        match self.store.delete(Collection::VpsPlans, id).await {
            Ok(()) => {
                self.invalidator.invalidate(invalidate::plan_targets());
                ActionOutcome::saved("Plan deleted.")
            }
            Err(err) if err.is_not_found() => ActionOutcome::rejected("id", "plan not found"),
            Err(err) => ActionOutcome::failed("delete_plan", &err),
        }
    }
}

/// Tag feature cards with fresh uuid keys. Presentation-layer only; the
/// stored document never carries them.
fn with_editor_ids(mut doc: Json) -> Json {
    if let Some(blocks) = doc.get_mut("blocks").and_then(Json::as_array_mut) {
        for block in blocks {
            if let Some(cards) = block.get_mut("features").and_then(Json::as_array_mut) {
                for card in cards {
                    if let Some(card) = card.as_object_mut() {
                        card.insert("id".into(), json!(Uuid::new_v4().to_string()));
                    }
                }
            }
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invalidate::Target;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use store::MemStore;

    /// Test sink that records every invalidated target.
    #[derive(Default)]
    struct Recording {
        targets: Mutex<Vec<Target>>,
    }

    impl CacheInvalidator for Recording {
        fn invalidate(&self, targets: Vec<Target>) {
            self.targets.lock().unwrap().extend(targets);
        }
    }

    impl Recording {
        fn paths(&self) -> Vec<String> {
            self.targets
                .lock()
                .unwrap()
                .iter()
                .map(|t| match t {
                    Target::Path(p) => p.clone(),
                    Target::AllPages => "*".into(),
                })
                .collect()
        }
    }

    /// Store double: reads find nothing, every write fails transiently.
    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn get(&self, _collection: Collection, _id: &str) -> store::Result<Option<Json>> {
            Ok(None)
        }

        async fn query(
            &self,
            _collection: Collection,
            _filter: Option<(&str, &Json)>,
            _order: store::Order,
        ) -> store::Result<Vec<Json>> {
            Ok(Vec::new())
        }

        async fn set(&self, _collection: Collection, _id: &str, _doc: Json) -> store::Result<()> {
            Err(StoreError::Transient("db unreachable".into()))
        }

        async fn update(
            &self,
            _collection: Collection,
            _id: &str,
            _fields: Map<String, Json>,
        ) -> store::Result<()> {
            Err(StoreError::Transient("db unreachable".into()))
        }

        async fn delete(&self, _collection: Collection, _id: &str) -> store::Result<()> {
            Err(StoreError::Transient("db unreachable".into()))
        }
    }

    fn harness() -> (Actions, Arc<MemStore>, Arc<Recording>) {
        let store = Arc::new(MemStore::new());
        let recording = Arc::new(Recording::default());
        let actions = Actions::new(store.clone(), recording.clone());
        (actions, store, recording)
    }

    fn post_input(slug: &str, category: &str, tags: &[&str]) -> Json {
        json!({
            "id": slug,
            "title": "Title",
            "body": "Body text.",
            "category": category,
            "tags": tags,
        })
    }

    #[tokio::test]
    async fn unknown_widget_is_rejected_and_not_persisted() {
        let (actions, store, recording) = harness();
        let outcome = actions
            .create_page(json!({
                "id": "landing",
                "title": "Landing",
                "blocks": [{"type": "unknown_widget", "x": 1}],
            }))
            .await;
        assert!(!outcome.ok);
        assert!(outcome
            .field_errors
            .iter()
            .any(|e| e.path == "blocks[0].type"));
        assert!(store
            .get(Collection::Pages, "landing")
            .await
            .unwrap()
            .is_none());
        assert!(recording.paths().is_empty());
    }

    #[tokio::test]
    async fn create_page_persists_and_invalidates() {
        let (actions, store, recording) = harness();
        let outcome = actions
            .create_page(json!({
                "id": "about",
                "title": "About",
                "blocks": [{"type": "paragraph", "text": "hi"}],
            }))
            .await;
        assert!(outcome.ok, "{outcome:?}");

        let stored = store
            .get(Collection::Pages, "about")
            .await
            .unwrap()
            .unwrap();
        assert!(stored["createdAt"].is_string());
        assert_eq!(recording.paths(), vec!["/about", "/admin/pages"]);

        // Duplicate slug is a field error, not a store write.
        let dup = actions
            .create_page(json!({
                "id": "about",
                "title": "About again",
                "blocks": [{"type": "paragraph", "text": "x"}],
            }))
            .await;
        assert!(!dup.ok);
        assert_eq!(dup.field_errors[0].path, "id");
    }

    #[tokio::test]
    async fn update_page_ignores_payload_slug() {
        let (actions, store, _) = harness();
        actions
            .create_page(json!({
                "id": "about", "title": "About",
                "blocks": [{"type": "paragraph", "text": "v1"}],
            }))
            .await;

        let outcome = actions
            .update_page(
                "about",
                json!({
                    "id": "sneaky-rename",
                    "title": "About v2",
                    "blocks": [{"type": "paragraph", "text": "v2"}],
                }),
            )
            .await;
        assert!(outcome.ok);
        let stored = store
            .get(Collection::Pages, "about")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["id"], "about");
        assert_eq!(stored["title"], "About v2");
        assert!(store
            .get(Collection::Pages, "sneaky-rename")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn category_change_invalidates_old_and_new_paths() {
        let (actions, _, recording) = harness();
        actions
            .create_post(post_input("intro", "ai", &[]))
            .await;

        let outcome = actions
            .update_post("intro", post_input("intro", "no-code", &[]))
            .await;
        assert!(outcome.ok, "{outcome:?}");

        let paths = recording.paths();
        assert!(paths.contains(&"/blog/category/ai".to_string()));
        assert!(paths.contains(&"/blog/category/no-code".to_string()));
    }

    #[tokio::test]
    async fn delete_post_invalidates_from_pre_delete_doc() {
        let (actions, store, recording) = harness();
        actions
            .create_post(post_input("gone", "news", &["archive"]))
            .await;
        let outcome = actions.delete_post("gone").await;
        assert!(outcome.ok);
        assert!(store.get(Collection::Posts, "gone").await.unwrap().is_none());
        let paths = recording.paths();
        assert!(paths.contains(&"/blog/gone".to_string()));
        assert!(paths.contains(&"/blog/tag/archive".to_string()));
    }

    #[tokio::test]
    async fn homepage_settings_enforce_three_cards() {
        let (actions, _, _) = harness();
        let outcome = actions
            .update_site_content(
                SiteContentKey::Homepage,
                json!({"blocks": [{
                    "type": "features",
                    "featuresTitle": "Why",
                    "features": [
                        {"icon": "zap", "title": "A", "description": "a"},
                    ],
                }]}),
            )
            .await;
        assert!(!outcome.ok);
        assert_eq!(outcome.field_errors[0].path, "blocks[0].features");
    }

    #[tokio::test]
    async fn footer_save_invalidates_every_page() {
        let (actions, _, recording) = harness();
        let outcome = actions
            .update_site_content(
                SiteContentKey::Footer,
                json!({"blocks": [{"type": "paragraph", "text": "new footer"}]}),
            )
            .await;
        assert!(outcome.ok);
        assert_eq!(recording.paths(), vec!["*"]);
    }

    #[tokio::test]
    async fn transient_store_failure_reports_generic_message() {
        let recording = Arc::new(Recording::default());
        let actions = Actions::new(Arc::new(FailingStore), recording.clone());
        let outcome = actions
            .create_page(json!({
                "id": "p", "title": "P",
                "blocks": [{"type": "paragraph", "text": "x"}],
            }))
            .await;
        assert!(!outcome.ok);
        // Generic message; no backend detail leaks to the editor.
        assert!(!outcome.message.contains("db unreachable"));
        assert!(outcome.field_errors.is_empty());
        // Failed write never triggers invalidation.
        assert!(recording.paths().is_empty());
    }

    #[tokio::test]
    async fn editor_view_tags_cards_but_store_stays_clean() {
        let (actions, store, _) = harness();
        actions
            .create_page(json!({
                "id": "landing",
                "title": "Landing",
                "blocks": [{
                    "type": "features",
                    "featuresTitle": "Why",
                    "features": [
                        {"icon": "zap", "title": "A", "description": "a"},
                        {"icon": "shield", "title": "B", "description": "b"},
                    ],
                }],
            }))
            .await;

        let view = actions.edit_page("landing").await.unwrap().unwrap();
        let cards = view["blocks"][0]["features"].as_array().unwrap();
        assert!(cards.iter().all(|c| c["id"].is_string()));
        assert_ne!(cards[0]["id"], cards[1]["id"]);

        // The persisted row never carries the ephemeral keys.
        let stored = store
            .get(Collection::Pages, "landing")
            .await
            .unwrap()
            .unwrap();
        assert!(stored["blocks"][0]["features"][0].get("id").is_none());
    }

    #[tokio::test]
    async fn set_post_image_stores_webhook_url() {
        let (actions, store, _) = harness();
        actions
            .create_post(post_input("with-image", "guides", &[]))
            .await;
        let outcome = actions
            .set_post_image("with-image", "https://cdn.example.com/up/1.png")
            .await;
        assert!(outcome.ok);
        let stored = store
            .get(Collection::Posts, "with-image")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["imageUrl"], "https://cdn.example.com/up/1.png");
    }
}
