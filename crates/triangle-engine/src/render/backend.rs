use std::ops::Range;

use anyhow::Result;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::shader::{InfoLog, ShaderStage};

use super::handles::{BufferHandle, ProgramHandle, ShaderHandle, VertexArrayHandle};
use super::vertex::{PrimitiveTopology, Vertex, VertexLayout};

/// Outcome of compiling one shader stage on a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderCompile {
    /// The shader object. Allocated even when compilation fails.
    pub handle: ShaderHandle,
    pub compiled: bool,
    pub log: InfoLog,
}

/// Outcome of linking two stages into a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLink {
    /// `ProgramHandle::INVALID` unless `linked`.
    pub handle: ProgramHandle,
    pub linked: bool,
    pub log: InfoLog,
}

impl ProgramLink {
    pub fn failed(log: InfoLog) -> Self {
        Self {
            handle: ProgramHandle::INVALID,
            linked: false,
            log,
        }
    }
}

/// Whether a frame was acquired and may be drawn into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameBegin {
    /// Target acquired and cleared.
    Ready,
    /// Transient surface problem; skip this frame.
    Skip,
}

/// One non-indexed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub program: ProgramHandle,
    pub vertex_array: VertexArrayHandle,
    pub topology: PrimitiveTopology,
    pub vertices: Range<u32>,
}

/// GPU operations the frame renderer is written against.
///
/// Objects are named by handles the backend allocates; the caller owns each
/// handle and deletes it exactly once.
pub trait GraphicsBackend {
    /// Sets the drawable area used by subsequent frames.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Uploads `vertices` into a new, immutable vertex buffer.
    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> Result<BufferHandle>;

    /// Describes how `buffer`'s bytes feed shader inputs.
    fn create_vertex_array(
        &mut self,
        buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> Result<VertexArrayHandle>;

    /// Compiles `source` for `stage`. Failure is reported in the result, not as `Err`.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderCompile;

    /// Links two compiled stages for use with `vertex_array`'s layout.
    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
        vertex_array: VertexArrayHandle,
    ) -> ProgramLink;

    /// Acquires the next target and clears it to `clear`.
    ///
    /// `Err` means the surface cannot recover.
    fn begin_frame(&mut self, clear: Color) -> Result<FrameBegin>;

    /// Records `call` into the frame opened by `begin_frame`.
    fn draw(&mut self, call: &DrawCall);

    /// Submits and presents the current frame.
    fn present(&mut self);

    fn delete_shader(&mut self, shader: ShaderHandle);
    fn delete_program(&mut self, program: ProgramHandle);
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);
    fn delete_buffer(&mut self, buffer: BufferHandle);
}
