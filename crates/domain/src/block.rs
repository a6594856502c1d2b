use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

// ─────────────────────────────────────────────────────────────────────────────
// Content block union
// ─────────────────────────────────────────────────────────────────────────────

/// One editable unit of page content.
///
/// Discriminated on the `type` field; the wire shape is what the visual
/// editor submits and what the `pages`/`site_content` collections store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ContentBlock {
    /// Full-width banner: headline plus supporting line.
    Hero {
        hero_title: String,
        hero_subtitle: String,
    },

    /// Titled strip of feature cards.
    Features {
        features_title: String,
        features: Vec<FeatureCard>,
    },

    /// Call-to-action banner.
    Cta {
        cta_title: String,
        cta_subtitle: String,
    },

    /// Section heading, level 1..=6.
    Heading { level: u8, text: String },

    /// Markdown body text.
    Paragraph { text: String },

    /// Remote image with alt text and an optional search/generation hint.
    Image {
        url: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },

    /// Icon + title + text card; adjacent cards render as one grid.
    ValueCard {
        icon: String,
        title: String,
        text: String,
    },
}

impl ContentBlock {
    /// Blocks that collapse into a shared grid when adjacent.
    pub fn is_groupable(&self) -> bool {
        matches!(self, ContentBlock::ValueCard { .. })
    }

    /// The wire discriminant for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Hero { .. } => "hero",
            ContentBlock::Features { .. } => "features",
            ContentBlock::Cta { .. } => "cta",
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Image { .. } => "image",
            ContentBlock::ValueCard { .. } => "value_card",
        }
    }
}

/// One card inside a `features` block.
///
/// The editor wraps these with an ephemeral drag-ordering `id`; that id is
/// stripped at the validation boundary and never reaches storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCard {
    pub icon: String,
    pub title: String,
    pub description: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Read-path (stored data) decoding
// ─────────────────────────────────────────────────────────────────────────────

/// A block as read back from storage.
///
/// Writes reject unknown discriminants, but documents persisted by an older
/// schema may still hold them. The read path decodes those as `Unsupported`
/// so page delivery renders a placeholder instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredBlock {
    Known(ContentBlock),
    Unsupported { kind: String },
}

impl StoredBlock {
    pub fn from_value(value: &Json) -> StoredBlock {
        match serde_json::from_value::<ContentBlock>(value.clone()) {
            Ok(block) => StoredBlock::Known(block),
            Err(_) => {
                let kind = value
                    .get("type")
                    .and_then(Json::as_str)
                    .unwrap_or("unknown")
                    .to_owned();
                StoredBlock::Unsupported { kind }
            }
        }
    }

    /// Decode a stored block array leniently, preserving order.
    pub fn from_list(values: &[Json]) -> Vec<StoredBlock> {
        values.iter().map(StoredBlock::from_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_wire_shape() {
        let block = ContentBlock::Hero {
            hero_title: "Fast VPS".into(),
            hero_subtitle: "Deployed in seconds".into(),
        };
        let wire = serde_json::to_value(&block).unwrap();
        assert_eq!(
            wire,
            json!({"type": "hero", "heroTitle": "Fast VPS", "heroSubtitle": "Deployed in seconds"})
        );
    }

    #[test]
    fn value_card_discriminant_is_snake_case() {
        let wire = serde_json::to_value(ContentBlock::ValueCard {
            icon: "shield".into(),
            title: "Secure".into(),
            text: "DDoS protected".into(),
        })
        .unwrap();
        assert_eq!(wire["type"], "value_card");
    }

    #[test]
    fn image_hint_is_optional_and_omitted() {
        let wire = serde_json::to_value(ContentBlock::Image {
            url: "https://cdn.example.com/a.png".into(),
            alt: "rack".into(),
            hint: None,
        })
        .unwrap();
        assert!(wire.get("hint").is_none());
    }

    #[test]
    fn stored_block_falls_back_on_unknown_tag() {
        let raw = json!({"type": "unknown_widget", "anything": 1});
        match StoredBlock::from_value(&raw) {
            StoredBlock::Unsupported { kind } => assert_eq!(kind, "unknown_widget"),
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn stored_block_decodes_known_tags() {
        let raw = json!({"type": "heading", "level": 2, "text": "Plans"});
        assert_eq!(
            StoredBlock::from_value(&raw),
            StoredBlock::Known(ContentBlock::Heading {
                level: 2,
                text: "Plans".into()
            })
        );
    }
}
