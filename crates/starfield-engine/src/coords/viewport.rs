/// Viewport rectangle in physical pixels.
///
/// Renderers map it to the rasterizer viewport; the starfield always covers the
/// full drawable, so `x`/`y` stay at zero unless a host embeds it in a sub-rect.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Clamps the viewport so it lies inside a `width` x `height` target.
    ///
    /// Returns `None` when nothing of the viewport remains visible.
    pub fn clamped_to(self, width: u32, height: u32) -> Option<Self> {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let w = self.width.min(width - x);
        let h = self.height.min(height - y);
        let clamped = Self { x, y, width: w, height: h };
        clamped.is_valid().then_some(clamped)
    }
}
