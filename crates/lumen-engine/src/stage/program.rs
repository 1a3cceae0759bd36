use glam::{Vec3, Vec4};

use crate::paint::Color;
use crate::render::Vertex;

/// Values carried from the vertex stage to the fragment stage.
///
/// The rasterizer supplies barycentric weights that already account for
/// perspective; implementors only blend.
pub trait Varying: Copy {
    fn interpolate(v: [&Self; 3], weights: Vec3) -> Self;
}

impl Varying for f32 {
    #[inline]
    fn interpolate([a, b, c]: [&Self; 3], w: Vec3) -> Self {
        a * w.x + b * w.y + c * w.z
    }
}

impl Varying for Vec3 {
    #[inline]
    fn interpolate([a, b, c]: [&Self; 3], w: Vec3) -> Self {
        *a * w.x + *b * w.y + *c * w.z
    }
}

/// A vertex/fragment stage pair runnable on the host.
///
/// Invocations must not depend on each other: the rasterizer may call them in
/// any order and any number of times.
pub trait ShaderProgram {
    type Varying: Varying;

    /// Returns the clip-space position and the values to interpolate.
    fn vertex(&self, vertex: &Vertex) -> (Vec4, Self::Varying);

    /// `frag_coord` mirrors WGSL `@builtin(position)` in a fragment stage:
    /// window x/y at the pixel centre, depth in z, 1/w in w.
    fn fragment(&self, frag_coord: Vec4, varying: &Self::Varying) -> Color;
}
