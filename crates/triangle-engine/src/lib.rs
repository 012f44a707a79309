//! Triangle engine crate.
//!
//! Window host, input, shader compile/link, and a frame renderer that draws a
//! single triangle through wgpu.

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;
