use glam::{Vec2, Vec3};

/// Render target extent in physical pixels.
///
/// Pixel space has its origin top-left with +Y down; NDC has +Y up.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Width over height; 1.0 for a degenerate viewport.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Maps NDC (x, y in [-1, 1], z in [0, 1]) to window coordinates.
    ///
    /// x/y come out in pixels with +Y down; z passes through as depth.
    #[inline]
    pub fn ndc_to_window(self, ndc: Vec3) -> Vec3 {
        let half = Vec2::new(self.width as f32, self.height as f32) * 0.5;
        Vec3::new(
            (ndc.x + 1.0) * half.x,
            (1.0 - ndc.y) * half.y,
            ndc.z,
        )
    }
}
