//! Recording test double for `GraphicsBackend`.
//!
//! Shaders go through the real naga compile and link checks; everything else
//! is recorded into a shared call log that outlives the backend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{bail, ensure, Result};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::shader::{compile_glsl, link_stages, CompiledStage, ShaderStage};

use super::backend::{DrawCall, FrameBegin, GraphicsBackend, ProgramLink, ShaderCompile};
use super::handles::{BufferHandle, HandleAllocator, ProgramHandle, ShaderHandle, VertexArrayHandle};
use super::vertex::{Vertex, VertexLayout};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetViewport(Viewport),
    CreateBuffer { handle: BufferHandle, vertices: usize },
    CreateVertexArray { handle: VertexArrayHandle, buffer: BufferHandle },
    CompileShader { handle: ShaderHandle, stage: ShaderStage, compiled: bool },
    LinkProgram { handle: ProgramHandle, linked: bool },
    BeginFrame(Color),
    Draw(DrawCall),
    Present,
    DeleteShader(ShaderHandle),
    DeleteProgram(ProgramHandle),
    DeleteVertexArray(VertexArrayHandle),
    DeleteBuffer(BufferHandle),
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    log: CallLog,
    ids: HandleAllocator,
    shaders: HashMap<ShaderHandle, CompiledStage>,
    vertex_arrays: HashMap<VertexArrayHandle, VertexLayout>,
    skip_frames: usize,
    fail_frames: bool,
}

impl RecordingBackend {
    pub(crate) fn new() -> (Self, CallLog) {
        let backend = Self::default();
        let log = backend.log.clone();
        (backend, log)
    }

    /// The next `n` `begin_frame` calls report `FrameBegin::Skip`.
    pub(crate) fn skip_next_frames(&mut self, n: usize) {
        self.skip_frames = n;
    }

    /// Every later `begin_frame` fails as if the surface were lost for good.
    pub(crate) fn fail_frames(&mut self) {
        self.fail_frames = true;
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl GraphicsBackend for RecordingBackend {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(Call::SetViewport(viewport));
    }

    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> Result<BufferHandle> {
        let handle = BufferHandle(self.ids.next());
        self.record(Call::CreateBuffer { handle, vertices: vertices.len() });
        Ok(handle)
    }

    fn create_vertex_array(
        &mut self,
        buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> Result<VertexArrayHandle> {
        ensure!(buffer.is_valid(), "invalid buffer handle");
        let handle = VertexArrayHandle(self.ids.next());
        self.vertex_arrays.insert(handle, layout.clone());
        self.record(Call::CreateVertexArray { handle, buffer });
        Ok(handle)
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderCompile {
        let handle = ShaderHandle(self.ids.next());
        let compiled = compile_glsl(stage, source);
        let out = ShaderCompile {
            handle,
            compiled: compiled.compiled,
            log: compiled.log.clone(),
        };
        self.shaders.insert(handle, compiled);
        self.record(Call::CompileShader { handle, stage, compiled: out.compiled });
        out
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
        vertex_array: VertexArrayHandle,
    ) -> ProgramLink {
        let checked = match (
            self.shaders.get(&vertex),
            self.shaders.get(&fragment),
            self.vertex_arrays.get(&vertex_array),
        ) {
            (Some(vs), Some(fs), Some(layout)) => link_stages(vs, fs, layout),
            _ => Err(crate::shader::InfoLog::bounded("unknown object handle")),
        };

        let link = match checked {
            Ok(()) => ProgramLink {
                handle: ProgramHandle(self.ids.next()),
                linked: true,
                log: Default::default(),
            },
            Err(log) => ProgramLink::failed(log),
        };
        self.record(Call::LinkProgram { handle: link.handle, linked: link.linked });
        link
    }

    fn begin_frame(&mut self, clear: Color) -> Result<FrameBegin> {
        if self.fail_frames {
            bail!("surface lost");
        }
        if self.skip_frames > 0 {
            self.skip_frames -= 1;
            return Ok(FrameBegin::Skip);
        }
        self.record(Call::BeginFrame(clear));
        Ok(FrameBegin::Ready)
    }

    fn draw(&mut self, call: &DrawCall) {
        self.record(Call::Draw(call.clone()));
    }

    fn present(&mut self) {
        self.record(Call::Present);
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.shaders.remove(&shader);
        self.record(Call::DeleteShader(shader));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.record(Call::DeleteProgram(program));
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array);
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.record(Call::DeleteBuffer(buffer));
    }
}
