//! Frame rendering.
//!
//! `FrameRenderer` owns the triangle's GPU objects and is written against the
//! `GraphicsBackend` trait. `WgpuBackend` is the real implementation; tests
//! use a recording double.

mod backend;
mod handles;
mod renderer;
mod vertex;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{DrawCall, FrameBegin, GraphicsBackend, ProgramLink, ShaderCompile};
pub use handles::{BufferHandle, ProgramHandle, ShaderHandle, VertexArrayHandle};
pub use renderer::{FrameOutcome, FrameRenderer, GpuResources, RenderStats, RendererConfig};
pub use vertex::{
    AttributeFormat, PrimitiveTopology, Vertex, VertexAttribute, VertexLayout, TRIANGLE,
};
pub use wgpu_backend::WgpuBackend;
