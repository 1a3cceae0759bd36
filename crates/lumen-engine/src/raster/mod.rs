//! Reference rasterizer.
//!
//! Stands in for the fixed-function stages between `vs_main` and `fs_main` so
//! the program can be exercised without a GPU. Single-sample, triangle lists
//! only, one color target plus depth.

mod config;
mod framebuffer;
mod rasterizer;

pub use config::{CullMode, FrontFace, RasterConfig};
pub use framebuffer::{Framebuffer, DEPTH_CLEAR};
pub use rasterizer::{DrawStats, Rasterizer};
