use crate::coords::Viewport;
use crate::paint::Color;

/// Depth value a target is cleared to.
pub const DEPTH_CLEAR: f32 = 1.0;

/// Color + depth target for the reference rasterizer.
///
/// Row-major, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    viewport: Viewport,
    color: Vec<Color>,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(viewport: Viewport, clear: Color) -> Self {
        let n = viewport.pixel_count();
        Self {
            viewport,
            color: vec![clear; n],
            depth: vec![DEPTH_CLEAR; n],
        }
    }

    /// Resets every pixel to `color` and every depth sample to `DEPTH_CLEAR`.
    pub fn clear(&mut self, color: Color) {
        self.color.fill(color);
        self.depth.fill(DEPTH_CLEAR);
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.viewport.width && y < self.viewport.height)
            .then(|| y as usize * self.viewport.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.color
    }

    /// Tightly packed `Rgba8Unorm` bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.color.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    /// Depth test + write for one sample. Returns `true` if the sample passed.
    pub(super) fn test_and_set_depth(&mut self, x: u32, y: u32, z: f32) -> bool {
        let Some(i) = self.index(x, y) else { return false };
        if z < self.depth[i] {
            self.depth[i] = z;
            true
        } else {
            false
        }
    }

    pub(super) fn write(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.color[i] = color;
        }
    }
}
