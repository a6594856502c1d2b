pub mod defaults;
pub mod markdown;
pub mod render;
pub mod resolve;

pub use render::{group_blocks, render_page, render_units, RenderUnit};
pub use resolve::{resolve_page, resolve_site_content, Origin, ResolvedPage};
