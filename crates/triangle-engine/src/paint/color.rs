/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Used for the framebuffer clear color; channels are passed to the backend
/// unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Dark teal background the triangle is drawn over.
    pub const BACKGROUND: Color = Color::opaque(0.2, 0.3, 0.3);
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_wgpu_color() {
        let w: wgpu::Color = Color::BACKGROUND.into();
        assert!((w.r - 0.2).abs() < 1e-6);
        assert!((w.g - 0.3).abs() < 1e-6);
        assert!((w.b - 0.3).abs() < 1e-6);
        assert_eq!(w.a, 1.0);
    }
}
