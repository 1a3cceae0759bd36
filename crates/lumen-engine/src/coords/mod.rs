//! Coordinate types shared by the camera and the reference rasterizer.
//!
//! Spaces:
//! - model / world: right-handed, +Y up
//! - clip: output of the vertex stage (homogeneous)
//! - NDC: clip / w, x and y in [-1, 1], z in [0, 1]
//! - window: physical pixels, origin top-left, +Y down

mod viewport;

pub use viewport::Viewport;
