// crates/serve/src/defaults.rs

//! Hardcoded fallback content.
//!
//! Pages and settings render from these whole documents when the store has
//! no entry yet, so nothing ever renders empty or broken before first
//! content entry. Substitution is all-or-nothing: a stored document is never
//! field-merged with a default.

use domain::block::{ContentBlock, FeatureCard};
use domain::doc::{PageDocument, SiteContentDocument, SiteContentKey};

pub fn default_homepage() -> SiteContentDocument {
    SiteContentDocument::new(SiteContentKey::Homepage).with_blocks(vec![
        ContentBlock::Hero {
            hero_title: "High-performance VPS hosting".into(),
            hero_subtitle: "NVMe storage, instant provisioning, predictable pricing.".into(),
        },
        ContentBlock::Features {
            features_title: "Why host with us".into(),
            features: vec![
                FeatureCard {
                    icon: "zap".into(),
                    title: "Fast by default".into(),
                    description: "Dedicated vCPU and NVMe storage on every plan.".into(),
                },
                FeatureCard {
                    icon: "shield".into(),
                    title: "Always protected".into(),
                    description: "DDoS mitigation and automated backups included.".into(),
                },
                FeatureCard {
                    icon: "headset".into(),
                    title: "Humans on support".into(),
                    description: "Real engineers answer, around the clock.".into(),
                },
            ],
        },
        ContentBlock::Cta {
            cta_title: "Launch your server in 60 seconds".into(),
            cta_subtitle: "Pick a plan and deploy. No setup fees, cancel anytime.".into(),
        },
    ])
}

pub fn default_footer() -> SiteContentDocument {
    SiteContentDocument::new(SiteContentKey::Footer).with_blocks(vec![ContentBlock::Paragraph {
        text: "Reliable VPS hosting since 2019. All systems monitored around the clock.".into(),
    }])
}

pub fn default_site_content(key: SiteContentKey) -> SiteContentDocument {
    match key {
        SiteContentKey::Homepage => default_homepage(),
        SiteContentKey::Footer => default_footer(),
        // Contact and general settings start with an empty block list; the
        // admin fills them in.
        SiteContentKey::ContactInfo | SiteContentKey::General => SiteContentDocument::new(key),
    }
}

pub fn default_page(slug: &str) -> PageDocument {
    match slug {
        "about" => PageDocument::new("about", "About Us")
            .with_meta_description("Who we are and why we build VPS hosting.")
            .with_blocks(vec![
                ContentBlock::Heading {
                    level: 1,
                    text: "About Us".into(),
                },
                ContentBlock::Paragraph {
                    text: "We run fast, reliable virtual servers so you can focus on \
                           shipping. Our platform is operated by a small team of \
                           infrastructure engineers."
                        .into(),
                },
            ]),
        "order" => PageDocument::new("order", "Order a VPS")
            .with_meta_description("Choose a plan and deploy in seconds.")
            .with_blocks(vec![ContentBlock::Heading {
                level: 1,
                text: "Order a VPS".into(),
            }]),
        other => PageDocument::new(other, humanize(other)).with_blocks(vec![
            ContentBlock::Heading {
                level: 1,
                text: humanize(other),
            },
            ContentBlock::Paragraph {
                text: "This page has not been published yet.".into(),
            },
        ]),
    }
}

fn humanize(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut cap_next = true;
    for ch in slug.chars() {
        if ch == '-' || ch == '_' {
            out.push(' ');
            cap_next = true;
        } else if cap_next {
            out.extend(ch.to_uppercase());
            cap_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_homepage_carries_exactly_three_features() {
        let doc = default_homepage();
        let features = doc
            .blocks
            .iter()
            .find_map(|b| match b {
                ContentBlock::Features { features, .. } => Some(features),
                _ => None,
            })
            .expect("homepage default has a features block");
        assert_eq!(features.len(), 3);
    }

    #[test]
    fn defaults_validate_against_their_own_rules() {
        use domain::validate::{validate_page_document, validate_site_content};
        let wire = serde_json::to_value(default_homepage()).unwrap();
        validate_site_content(SiteContentKey::Homepage, &wire).unwrap();

        let wire = serde_json::to_value(default_page("about")).unwrap();
        validate_page_document(&wire).unwrap();
    }

    #[test]
    fn unknown_slug_gets_a_humanized_placeholder() {
        let doc = default_page("service-status");
        assert_eq!(doc.title, "Service Status");
        assert!(!doc.blocks.is_empty());
    }
}
