//! GPU-facing side of the flat-color program.
//!
//! Owns the WGSL source and the host/GPU data contract:
//! - `Globals` uniform at `@group(0) @binding(0)`
//! - `Vertex` buffer layout (locations 0 and 1)
//! - fixed-function state the program is drawn with
//!
//! Convention:
//! - Matrices are column-major (glam / WGSL).
//! - Clip space follows wgpu: NDC depth in [0, 1], +Y up.

mod layout;
mod shader;
pub mod state;

pub use layout::{Globals, Vertex, VertexOutput};
pub use shader::{
    shader_module_descriptor, validate_flat_shader, validate_wgsl, ShaderInfo, FLAT_SHADER_WGSL,
    FS_ENTRY, VS_ENTRY,
};
