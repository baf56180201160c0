use winit::dpi::PhysicalSize;

/// Drawable size in device (physical) pixels.
///
/// Updated by resize notifications and read whenever the swapchain is built.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts a CSS pixel size at `scale` device pixels per CSS pixel.
    ///
    /// Negative or non-finite input reads as zero.
    pub fn from_css(width: f64, height: f64, scale: f64) -> Self {
        let px = |v: f64| {
            let v = (v * scale).round();
            if v.is_finite() && v > 0.0 { v.min(u32::MAX as f64) as u32 } else { 0 }
        };
        Self::new(px(width), px(height))
    }

    /// A zero-area viewport (minimised window, collapsed canvas) cannot back a swapchain.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PhysicalSize<u32>> for ViewportSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
