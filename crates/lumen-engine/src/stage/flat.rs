use glam::{Vec3, Vec4};

use crate::paint::Color;
use crate::render::{Globals, Vertex, VertexOutput};

use super::program::ShaderProgram;

/// Normal emitted by the vertex stage for every vertex.
pub const OUTPUT_NORMAL: Vec3 = Vec3::ONE;

/// Shade factor the fragment stage holds for its disabled lighting term.
pub const SHADE: f32 = 0.2;

/// Output color of the fragment stage.
pub const OUTPUT_COLOR: Color = Color::RED;

/// Light direction of the disabled lighting term, normalized (1, 2, 3).
#[inline]
pub fn light_dir() -> Vec3 {
    Vec3::new(1.0, 2.0, 3.0).normalize()
}

/// Host execution of `vs_main` for one vertex.
///
/// The position is promoted with w = 1 and transformed; nothing guards a
/// degenerate w, the fixed-function stage downstream owns that. The input
/// normal is ignored.
#[inline]
pub fn vs_main(globals: &Globals, vertex: &Vertex) -> VertexOutput {
    let pos = Vec3::from_array(vertex.pos);
    VertexOutput {
        position: globals.mat4() * pos.extend(1.0),
        normal: OUTPUT_NORMAL,
    }
}

/// Host execution of `fs_main` for one fragment.
///
/// Always opaque red; the interpolated input does not participate.
#[inline]
pub fn fs_main(_input: &VertexOutput) -> Color {
    OUTPUT_COLOR
}

/// The flat program bound to one draw's `Globals`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FlatProgram {
    pub globals: Globals,
}

impl FlatProgram {
    #[inline]
    pub fn new(globals: Globals) -> Self {
        Self { globals }
    }
}

impl ShaderProgram for FlatProgram {
    type Varying = Vec3;

    fn vertex(&self, vertex: &Vertex) -> (Vec4, Vec3) {
        let out = vs_main(&self.globals, vertex);
        (out.position, out.normal)
    }

    fn fragment(&self, frag_coord: Vec4, normal: &Vec3) -> Color {
        fs_main(&VertexOutput { position: frag_coord, normal: *normal })
    }
}
