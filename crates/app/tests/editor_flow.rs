//! End-to-end editor flow: write through the actions, read through
//! resolution, render to HTML.

use std::sync::{Arc, Mutex};

use serde_json::json;

use app::{Actions, CacheInvalidator, Target};
use domain::doc::SiteContentKey;
use serve::{render_page, resolve_page, resolve_site_content, Origin};
use store::{Collection, DocumentStore, MemStore};

#[derive(Default)]
struct Recording {
    targets: Mutex<Vec<Target>>,
}

impl CacheInvalidator for Recording {
    fn invalidate(&self, targets: Vec<Target>) {
        self.targets.lock().unwrap().extend(targets);
    }
}

fn harness() -> (Actions, Arc<MemStore>, Arc<Recording>) {
    let store = Arc::new(MemStore::new());
    let recording = Arc::new(Recording::default());
    (
        Actions::new(store.clone(), recording.clone()),
        store,
        recording,
    )
}

#[tokio::test]
async fn page_write_then_read_then_render() {
    let (actions, store, _) = harness();

    let outcome = actions
        .create_page(json!({
            "id": "why-us",
            "title": "Why Us",
            "metaDescription": "Reasons to host here.",
            "blocks": [
                {"type": "hero", "heroTitle": "Built for speed", "heroSubtitle": "NVMe everywhere"},
                {"type": "value_card", "icon": "zap", "title": "Fast", "text": "Provision in seconds"},
                {"type": "value_card", "icon": "shield", "title": "Safe", "text": "DDoS protected"},
                {"type": "heading", "level": 2, "text": "The numbers"},
                {"type": "value_card", "icon": "globe", "title": "Global", "text": "9 regions"},
                {"type": "paragraph", "text": "# Uptime\n\n**99.99%** across 2025."},
            ],
        }))
        .await;
    assert!(outcome.ok, "{outcome:?}");

    let page = resolve_page(store.as_ref(), "why-us").await.unwrap();
    assert_eq!(page.origin, Origin::Stored);
    assert_eq!(page.title, "Why Us");

    let html = render_page(&page);
    // [vc, vc, heading, vc] inside the list -> two separate grids around the
    // heading, order preserved.
    assert_eq!(html.matches("card-grid").count(), 2);
    assert!(html.contains("<h2>The numbers</h2>"));
    assert!(html.contains("<strong>99.99%</strong>"));
    let hero = html.find("Built for speed").unwrap();
    let numbers = html.find("The numbers").unwrap();
    assert!(hero < numbers);
}

#[tokio::test]
async fn homepage_settings_flow_with_three_features() {
    let (actions, store, recording) = harness();

    let outcome = actions
        .update_site_content(
            SiteContentKey::Homepage,
            json!({"blocks": [
                {"type": "hero", "heroTitle": "VPS hosting", "heroSubtitle": "Done right"},
                {"type": "features", "featuresTitle": "Why us", "features": [
                    {"id": "tmp-1", "icon": "zap", "title": "Fast", "description": "NVMe"},
                    {"id": "tmp-2", "icon": "shield", "title": "Safe", "description": "DDoS"},
                    {"id": "tmp-3", "icon": "headset", "title": "Supported", "description": "24/7"},
                ]},
            ]}),
        )
        .await;
    assert!(outcome.ok, "{outcome:?}");
    assert_eq!(recording.targets.lock().unwrap().as_slice(), &[Target::path("/")]);

    // Ephemeral editor ids never reach storage.
    let stored = store
        .get(Collection::SiteContent, "homepage")
        .await
        .unwrap()
        .unwrap();
    assert!(stored["blocks"][1]["features"][0].get("id").is_none());

    let content = resolve_site_content(store.as_ref(), SiteContentKey::Homepage)
        .await
        .unwrap();
    assert_eq!(content.origin, Origin::Stored);
    let html = render_page(&content);
    assert_eq!(html.matches("feature-card").count(), 3);
}

#[tokio::test]
async fn post_lifecycle_with_slug_rename() {
    let (actions, store, recording) = harness();

    actions
        .create_post(json!({
            "id": "first-steps",
            "title": "First steps",
            "body": "Pick a plan.",
            "category": "guides",
            "tags": ["vps"],
        }))
        .await;

    // Rename the slug on update: both old and new paths must be invalidated
    // and the old row must not linger.
    let outcome = actions
        .update_post(
            "first-steps",
            json!({
                "id": "getting-started",
                "title": "Getting started",
                "body": "Pick a plan, then deploy.",
                "category": "guides",
                "tags": ["vps"],
            }),
        )
        .await;
    assert!(outcome.ok, "{outcome:?}");

    assert!(store
        .get(Collection::Posts, "first-steps")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .get(Collection::Posts, "getting-started")
        .await
        .unwrap()
        .is_some());

    let paths: Vec<String> = recording
        .targets
        .lock()
        .unwrap()
        .iter()
        .filter_map(|t| match t {
            Target::Path(p) => Some(p.clone()),
            Target::AllPages => None,
        })
        .collect();
    assert!(paths.contains(&"/blog/first-steps".to_string()));
    assert!(paths.contains(&"/blog/getting-started".to_string()));

    let outcome = actions.delete_post("getting-started").await;
    assert!(outcome.ok);
    assert!(store
        .get(Collection::Posts, "getting-started")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn absent_page_renders_default_without_error() {
    let (_, store, _) = harness();
    let page = resolve_page(store.as_ref(), "about").await.unwrap();
    assert_eq!(page.origin, Origin::Default);
    let html = render_page(&page);
    assert!(html.contains("About Us"));
}
