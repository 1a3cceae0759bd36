//! GPU data contract shared by the host and `flat.wgsl`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

// ── globals uniform ───────────────────────────────────────────────────────

/// Per-draw uniform block (`@group(0) @binding(0)`).
///
/// Written by the host before a draw and read-only for every invocation of it.
/// `mvp_transform` is column-major, matching WGSL `mat4x4<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub mvp_transform: [[f32; 4]; 4],
}

impl Default for Globals {
    fn default() -> Self {
        Self::from_mat4(Mat4::IDENTITY)
    }
}

impl Globals {
    pub const BINDING: u32 = 0;

    #[inline]
    pub fn from_mat4(mvp: Mat4) -> Self {
        Self { mvp_transform: mvp.to_cols_array_2d() }
    }

    #[inline]
    pub fn mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.mvp_transform)
    }

    /// Minimum binding size for the uniform buffer holding `Globals`.
    ///
    /// `Globals` is a 4x4 matrix (64 bytes), so the size is never zero.
    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<Globals>() as u64)
            .expect("Globals has non-zero size by construction")
    }

    /// Bind group layout entry for the uniform, visible to the vertex stage only.
    pub fn bind_group_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(Self::min_binding_size()),
            },
            count: None,
        }
    }
}

// ── vertex ────────────────────────────────────────────────────────────────

/// Per-vertex input: model-space position and normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x3  // normal
    ];

    #[inline]
    pub const fn new(pos: [f32; 3], normal: [f32; 3]) -> Self {
        Self { pos, normal }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── vertex output ─────────────────────────────────────────────────────────

/// Host mirror of the WGSL `VertexOutput` struct.
///
/// `position` is clip space (the builtin position slot); `normal` travels to
/// the fragment stage through interpolation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    pub position: Vec4,
    pub normal: Vec3,
}
