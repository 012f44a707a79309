use winit::dpi::PhysicalSize;

/// Drawable area in physical pixels.
///
/// The renderer applies this to the backend before drawing; a zero-area
/// viewport (minimized window) is a valid value but no frame is drawn into it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
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
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PhysicalSize<u32>> for Viewport {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Viewport> for PhysicalSize<u32> {
    fn from(vp: Viewport) -> Self {
        PhysicalSize::new(vp.width, vp.height)
    }
}
