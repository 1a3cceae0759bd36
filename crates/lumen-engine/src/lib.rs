//! Lumen engine crate.
//!
//! The flat-color shader program (`vs_main` / `fs_main`), the data contract
//! between it and its host, and a host-side reference pipeline that runs the
//! same program without a GPU.

pub mod camera;
pub mod coords;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod raster;
pub mod render;
pub mod stage;
