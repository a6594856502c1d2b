// crates/serve/src/markdown.rs

//! Markdown-to-HTML transform for `paragraph` blocks and post bodies.
//!
//! Authored content is admin-origin, not public input, but raw HTML inside
//! the markdown source is still escaped: only the transform's own output is
//! emitted unescaped.

fn default_markdown_options() -> comrak::Options<'static> {
    let mut opt = comrak::Options::default();
    opt.extension.strikethrough = true;
    opt.extension.table = true;
    opt.extension.autolink = true;
    opt.extension.tasklist = true;
    opt.extension.footnotes = true;
    // Escape raw HTML rather than dropping it; unsafe_ stays off.
    opt.render.escape = true;
    opt
}

#[tracing::instrument(skip_all)]
pub fn markdown_to_html(source: &str) -> String {
    comrak::markdown_to_html(source, &default_markdown_options())
}
