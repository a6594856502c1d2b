pub mod blocks;
pub mod group;
pub mod icons;

pub use blocks::{render_page, render_unit, render_units};
pub use group::{group_blocks, RenderUnit};
