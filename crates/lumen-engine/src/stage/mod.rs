//! Host-side execution of shader stages.
//!
//! `vs_main` / `fs_main` reproduce the active code path of `flat.wgsl` one
//! invocation at a time. `ShaderProgram` is the seam the reference rasterizer
//! drives.

mod flat;
mod program;

pub use flat::{fs_main, light_dir, vs_main, FlatProgram, OUTPUT_COLOR, OUTPUT_NORMAL, SHADE};
pub use program::{ShaderProgram, Varying};
