//! Pixel-space types shared by the host and the renderer.
//!
//! Everything here is in physical pixels; there is no logical/DPI-scaled space
//! because the triangle is specified directly in NDC.

mod viewport;

pub use viewport::Viewport;
