// crates/serve/src/render/icons.rs

//! Fixed icon registry for `value_card` and feature-card blocks.
//!
//! Editors store icons by name; render resolves the name here. An unknown
//! name falls back to the default icon and never errors, so a renamed icon
//! in a future release cannot break stored pages.

pub const DEFAULT_ICON: &str = "sparkles";

const KNOWN_ICONS: &[&str] = &[
    "sparkles", "zap", "shield", "globe", "server", "cpu", "database", "clock", "cloud",
    "headset", "lock", "rocket", "wallet",
];

/// Resolve an icon identifier to a registered name.
pub fn resolve(name: &str) -> &'static str {
    KNOWN_ICONS
        .iter()
        .find(|known| **known == name)
        .copied()
        .unwrap_or(DEFAULT_ICON)
}
