//! Page and site-content validation, including the block union.

use serde_json::{Map, Value as Json};
use url::Url;

use crate::block::{ContentBlock, FeatureCard};
use crate::doc::{PageDocument, SiteContentDocument, SiteContentKey};

use super::{
    as_object, check_slug, join, optional_str, optional_timestamp, require_str, str_or_empty,
    Errors, ValidationError,
};

/// How many cards a `features` block must carry, enforced per call site:
/// the homepage settings form renders exactly three slots, page editors may
/// add more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRule {
    ExactlyThree,
    AtLeastOne,
}

/// Validate a whole page submission into a typed document.
///
/// The block list is replaced wholesale on update, so the full ordered list
/// is validated every time.
#[tracing::instrument(skip_all)]
pub fn validate_page_document(value: &Json) -> Result<PageDocument, ValidationError> {
    let mut errors = Errors::default();
    let Some(obj) = as_object(value, "", &mut errors) else {
        return errors.into_result(PageDocument::new("", ""));
    };

    let id = require_str(obj, "", "id", &mut errors).unwrap_or_default();
    if !id.is_empty() {
        check_slug(&id, "id", &mut errors);
    }
    let title = require_str(obj, "", "title", &mut errors).unwrap_or_default();
    let meta_description = str_or_empty(obj, "", "metaDescription", &mut errors);
    let blocks = validate_blocks(obj, FeatureRule::AtLeastOne, &mut errors);
    let created_at = optional_timestamp(obj, "", "createdAt", &mut errors);
    let updated_at = optional_timestamp(obj, "", "updatedAt", &mut errors);

    let mut doc = PageDocument::new(id, title)
        .with_meta_description(meta_description)
        .with_blocks(blocks);
    doc.created_at = created_at;
    doc.updated_at = updated_at;
    errors.into_result(doc)
}

/// Validate a singleton settings submission (homepage, footer, ...).
#[tracing::instrument(skip_all)]
pub fn validate_site_content(
    key: SiteContentKey,
    value: &Json,
) -> Result<SiteContentDocument, ValidationError> {
    let rule = match key {
        SiteContentKey::Homepage => FeatureRule::ExactlyThree,
        _ => FeatureRule::AtLeastOne,
    };

    let mut errors = Errors::default();
    let Some(obj) = as_object(value, "", &mut errors) else {
        return errors.into_result(SiteContentDocument::new(key));
    };

    let blocks = validate_blocks(obj, rule, &mut errors);
    let created_at = optional_timestamp(obj, "", "createdAt", &mut errors);
    let updated_at = optional_timestamp(obj, "", "updatedAt", &mut errors);

    let mut doc = SiteContentDocument::new(key).with_blocks(blocks);
    doc.created_at = created_at;
    doc.updated_at = updated_at;
    errors.into_result(doc)
}

fn validate_blocks(
    obj: &Map<String, Json>,
    rule: FeatureRule,
    errors: &mut Errors,
) -> Vec<ContentBlock> {
    let Some(raw) = obj.get("blocks") else {
        errors.push("blocks", "is required");
        return Vec::new();
    };
    let Some(items) = raw.as_array() else {
        errors.push("blocks", "must be an array");
        return Vec::new();
    };

    let mut blocks = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("blocks[{i}]");
        if let Some(block) = validate_block(item, &path, rule, errors) {
            blocks.push(block);
        }
    }
    blocks
}

/// Validate one block. Unknown `type` discriminants are rejected here so the
/// editor never silently loses content; legacy data on the read path goes
/// through `StoredBlock` instead.
fn validate_block(
    value: &Json,
    path: &str,
    rule: FeatureRule,
    errors: &mut Errors,
) -> Option<ContentBlock> {
    let obj = as_object(value, path, errors)?;
    let kind = require_str(obj, path, "type", errors)?;

    match kind.as_str() {
        "hero" => {
            let title = require_str(obj, path, "heroTitle", errors);
            let subtitle = require_str(obj, path, "heroSubtitle", errors);
            Some(ContentBlock::Hero {
                hero_title: title?,
                hero_subtitle: subtitle?,
            })
        }
        "features" => {
            let title = require_str(obj, path, "featuresTitle", errors);
            let features = validate_feature_cards(obj, path, rule, errors);
            Some(ContentBlock::Features {
                features_title: title?,
                features: features?,
            })
        }
        "cta" => {
            let title = require_str(obj, path, "ctaTitle", errors);
            let subtitle = require_str(obj, path, "ctaSubtitle", errors);
            Some(ContentBlock::Cta {
                cta_title: title?,
                cta_subtitle: subtitle?,
            })
        }
        "heading" => {
            let text = require_str(obj, path, "text", errors);
            let level = match obj.get("level").and_then(Json::as_i64) {
                // Out-of-range levels are clamped, not rejected.
                Some(n) => n.clamp(1, 6) as u8,
                None => {
                    errors.push(join(path, "level"), "must be an integer");
                    return None;
                }
            };
            Some(ContentBlock::Heading {
                level,
                text: text?,
            })
        }
        "paragraph" => {
            let text = require_str(obj, path, "text", errors);
            Some(ContentBlock::Paragraph { text: text? })
        }
        "image" => {
            let url = require_str(obj, path, "url", errors);
            let alt = str_or_empty(obj, path, "alt", errors);
            let hint = optional_str(obj, path, "hint", errors);
            let url = url?;
            check_http_url(&url, &join(path, "url"), errors)?;
            Some(ContentBlock::Image { url, alt, hint })
        }
        "value_card" => {
            let icon = require_str(obj, path, "icon", errors);
            let title = require_str(obj, path, "title", errors);
            let text = require_str(obj, path, "text", errors);
            Some(ContentBlock::ValueCard {
                icon: icon?,
                title: title?,
                text: text?,
            })
        }
        other => {
            errors.push(join(path, "type"), format!("unknown block type `{other}`"));
            None
        }
    }
}

/// Cards lose their ephemeral editor `id` here; the persisted form never
/// carries it.
fn validate_feature_cards(
    obj: &Map<String, Json>,
    path: &str,
    rule: FeatureRule,
    errors: &mut Errors,
) -> Option<Vec<FeatureCard>> {
    let field = join(path, "features");
    let before = errors.len();
    let Some(items) = obj.get("features").and_then(Json::as_array) else {
        errors.push(field, "must be an array of feature cards");
        return None;
    };

    match rule {
        FeatureRule::ExactlyThree if items.len() != 3 => {
            errors.push(
                field.as_str(),
                format!("must contain exactly 3 cards, got {}", items.len()),
            );
        }
        FeatureRule::AtLeastOne if items.is_empty() => {
            errors.push(field.as_str(), "must contain at least 1 card");
        }
        _ => {}
    }

    let mut cards = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let card_path = format!("{field}[{i}]");
        let Some(card) = item.as_object() else {
            errors.push(card_path, "must be an object");
            continue;
        };
        let icon = require_str(card, &card_path, "icon", errors);
        let title = require_str(card, &card_path, "title", errors);
        let description = require_str(card, &card_path, "description", errors);
        if let (Some(icon), Some(title), Some(description)) = (icon, title, description) {
            cards.push(FeatureCard {
                icon,
                title,
                description,
            });
        }
    }

    (errors.len() == before).then_some(cards)
}

/// Require http/https scheme and a host, as for the site base URL.
fn check_http_url(raw: &str, path: &str, errors: &mut Errors) -> Option<()> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Some(()),
        Ok(url) => {
            errors.push(path, format!("unsupported scheme: {}", url.scheme()));
            None
        }
        Err(e) => {
            errors.push(path, format!("invalid URL: {e}"));
            None
        }
    }
}
