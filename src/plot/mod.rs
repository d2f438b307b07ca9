//! Plain-text renderings and color scales.

pub mod ascii;
pub mod palette;

pub use ascii::{render_scatter, render_tile_map};
