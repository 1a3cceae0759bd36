//! Color values written to render targets.

mod color;

pub use color::Color;
