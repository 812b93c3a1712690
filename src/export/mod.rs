//! Geometry export formats.

pub mod css;

pub use css::{css_quads, CssOptions, CssQuad};
