// crates/serve/src/render/blocks.rs

//! Block → HTML dispatch.
//!
//! The match over [`ContentBlock`] is exhaustive; `StoredBlock::Unsupported`
//! carries the explicit fallback arm so legacy discriminants render a
//! visible, harmless placeholder instead of failing page delivery. Every
//! scalar field is escaped; only the markdown transform's output is emitted
//! as-is.

use std::fmt::Write as _;

use domain::block::{ContentBlock, FeatureCard, StoredBlock};

use super::group::RenderUnit;
use super::icons;
use crate::markdown::markdown_to_html;
use crate::resolve::ResolvedPage;

fn esc(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn esc_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

fn icon_span(name: &str) -> String {
    format!(
        r#"<span class="icon icon-{}" aria-hidden="true"></span>"#,
        icons::resolve(name)
    )
}

fn render_feature_card(card: &FeatureCard) -> String {
    format!(
        concat!(
            r#"<div class="feature-card">"#,
            "{icon}",
            "<h3>{title}</h3>",
            "<p>{description}</p>",
            "</div>"
        ),
        icon = icon_span(&card.icon),
        title = esc(&card.title),
        description = esc(&card.description),
    )
}

fn render_known(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Hero {
            hero_title,
            hero_subtitle,
        } => format!(
            r#"<section class="hero"><h1>{}</h1><p>{}</p></section>"#,
            esc(hero_title),
            esc(hero_subtitle)
        ),

        ContentBlock::Features {
            features_title,
            features,
        } => {
            let mut out = format!(
                r#"<section class="features"><h2>{}</h2><div class="feature-grid">"#,
                esc(features_title)
            );
            for card in features {
                out.push_str(&render_feature_card(card));
            }
            out.push_str("</div></section>");
            out
        }

        ContentBlock::Cta {
            cta_title,
            cta_subtitle,
        } => format!(
            r#"<section class="cta"><h2>{}</h2><p>{}</p></section>"#,
            esc(cta_title),
            esc(cta_subtitle)
        ),

        ContentBlock::Heading { level, text } => {
            // Validation clamps, but stored legacy data may predate that.
            let level = (*level).clamp(1, 6);
            format!("<h{level}>{}</h{level}>", esc(text))
        }

        ContentBlock::Paragraph { text } => {
            format!(r#"<div class="prose">{}</div>"#, markdown_to_html(text))
        }

        ContentBlock::Image { url, alt, hint: _ } => format!(
            r#"<figure><img src="{}" alt="{}"></figure>"#,
            esc_attr(url),
            esc_attr(alt)
        ),

        ContentBlock::ValueCard { icon, title, text } => format!(
            r#"<div class="value-card">{}<h3>{}</h3><p>{}</p></div>"#,
            icon_span(icon),
            esc(title),
            esc(text)
        ),
    }
}

fn render_block(block: &StoredBlock) -> String {
    match block {
        StoredBlock::Known(known) => render_known(known),
        StoredBlock::Unsupported { kind } => format!(
            r#"<div class="unsupported-block" data-kind="{}"><!-- unsupported block --></div>"#,
            esc_attr(kind)
        ),
    }
}

pub fn render_unit(unit: &RenderUnit) -> String {
    match unit {
        RenderUnit::Single(block) => render_block(block),
        RenderUnit::CardGrid(run) => {
            let mut out = String::from(r#"<div class="card-grid">"#);
            for block in run {
                out.push_str(&render_block(block));
            }
            out.push_str("</div>");
            out
        }
    }
}

/// Render grouped units in order.
pub fn render_units(units: &[RenderUnit]) -> String {
    let mut out = String::new();
    for unit in units {
        out.push_str(&render_unit(unit));
    }
    out
}

/// Render a resolved page to an HTML fragment: grouping pass, then dispatch.
#[tracing::instrument(skip_all, fields(page = %page.id))]
pub fn render_page(page: &ResolvedPage) -> String {
    let units = super::group::group_blocks(page.blocks.clone());
    let mut out = String::new();
    let _ = write!(out, r#"<main data-page="{}">"#, esc_attr(&page.id));
    out.push_str(&render_units(&units));
    out.push_str("</main>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::group_blocks;

    fn single(block: ContentBlock) -> RenderUnit {
        RenderUnit::Single(StoredBlock::Known(block))
    }

    #[test]
    fn hero_escapes_fields() {
        let html = render_unit(&single(ContentBlock::Hero {
            hero_title: "Fast <VPS>".into(),
            hero_subtitle: "a & b".into(),
        }));
        assert!(html.contains("Fast &lt;VPS&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn paragraph_renders_markdown() {
        let html = render_unit(&single(ContentBlock::Paragraph {
            text: "# Hi\n\n**bold**".into(),
        }));
        assert!(html.contains("<h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn unsupported_block_renders_placeholder() {
        let html = render_unit(&RenderUnit::Single(StoredBlock::Unsupported {
            kind: "unknown_widget".into(),
        }));
        assert!(html.contains("unsupported-block"));
        assert!(html.contains("unknown_widget"));
    }

    #[test]
    fn unknown_icon_falls_back_to_default() {
        let html = render_unit(&single(ContentBlock::ValueCard {
            icon: "no-such-icon".into(),
            title: "T".into(),
            text: "t".into(),
        }));
        assert!(html.contains("icon-sparkles"));
    }

    #[test]
    fn card_runs_render_as_one_grid() {
        let card = |t: &str| {
            StoredBlock::Known(ContentBlock::ValueCard {
                icon: "zap".into(),
                title: t.into(),
                text: "x".into(),
            })
        };
        let units = group_blocks(vec![card("a"), card("b")]);
        let html = render_units(&units);
        assert_eq!(html.matches("card-grid").count(), 1);
        assert_eq!(html.matches("value-card").count(), 2);
    }

    #[test]
    fn image_attributes_are_quoted_and_escaped() {
        let html = render_unit(&single(ContentBlock::Image {
            url: "https://cdn.example.com/a.png".into(),
            alt: "a \"rack\"".into(),
            hint: Some("server rack".into()),
        }));
        assert!(html.contains(r#"src="https://cdn.example.com/a.png""#));
        assert!(html.contains("&quot;rack&quot;"));
    }
}
