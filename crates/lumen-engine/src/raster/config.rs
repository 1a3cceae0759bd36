use crate::coords::Viewport;
use crate::paint::Color;

/// Which triangle faces are discarded before shading.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum CullMode {
    None,
    #[default]
    Back,
    Front,
}

/// Winding order (as seen in NDC, +Y up) that counts as front-facing.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FrontFace {
    #[default]
    Ccw,
    Cw,
}

/// Reference rasterizer configuration.
///
/// Defaults match the fixed-function state the flat program is drawn with
/// (`render::state`): CCW front faces, back-face culling, `Less` depth test,
/// color cleared to white.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Extent of targets created through `Rasterizer::target`.
    pub viewport: Viewport,

    /// Color a fresh target is cleared to.
    pub clear_color: Color,

    pub cull_mode: CullMode,

    pub front_face: FrontFace,

    /// Enables depth testing and depth writes.
    ///
    /// Fragments outside the [0, 1] depth range are dropped either way.
    pub depth_test: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800, 600),
            clear_color: Color::WHITE,
            cull_mode: CullMode::Back,
            front_face: FrontFace::Ccw,
            depth_test: true,
        }
    }
}

impl RasterConfig {
    #[inline]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    #[inline]
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    #[inline]
    pub fn with_clear_color(mut self, clear_color: Color) -> Self {
        self.clear_color = clear_color;
        self
    }

    #[inline]
    pub fn with_depth_test(mut self, depth_test: bool) -> Self {
        self.depth_test = depth_test;
        self
    }

    /// Whether a triangle with the given NDC winding survives culling.
    pub(super) fn keeps(&self, ccw: bool) -> bool {
        let front = ccw == (self.front_face == FrontFace::Ccw);
        match self.cull_mode {
            CullMode::None => true,
            CullMode::Back => front,
            CullMode::Front => !front,
        }
    }
}
