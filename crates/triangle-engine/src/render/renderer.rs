use anyhow::{ensure, Result};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::shader::{ShaderError, ShaderFailurePolicy, ShaderSources, ShaderStage};

use super::backend::{DrawCall, FrameBegin, GraphicsBackend};
use super::handles::{BufferHandle, ProgramHandle, VertexArrayHandle};
use super::vertex::{PrimitiveTopology, Vertex, VertexLayout, TRIANGLE};

/// Everything the frame renderer draws, supplied by the caller.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub shaders: ShaderSources,
    pub vertices: Vec<Vertex>,
    pub layout: VertexLayout,
    pub clear_color: Color,
    pub failure_policy: ShaderFailurePolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shaders: ShaderSources::builtin(),
            vertices: TRIANGLE.to_vec(),
            layout: VertexLayout::position3(),
            clear_color: Color::BACKGROUND,
            failure_policy: ShaderFailurePolicy::default(),
        }
    }
}

/// The one set of GPU objects the renderer draws with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GpuResources {
    pub buffer: BufferHandle,
    pub vertex_array: VertexArrayHandle,
    /// `ProgramHandle::INVALID` when compile or link failed under
    /// `ShaderFailurePolicy::LogAndContinue`.
    pub program: ProgramHandle,
    pub vertex_count: u32,
}

/// What happened to one requested frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// Nothing was drawn or presented (zero-area viewport or surface hiccup).
    Skipped,
}

/// Counters over the renderer's lifetime.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderStats {
    pub resource_sets_created: u32,
    pub frames_presented: u64,
    pub frames_skipped: u64,
    pub draw_calls: u64,
}

/// Draws the configured triangle once per frame.
///
/// GPU objects are created on the first `prepare`/`render_frame` call and
/// reused for every later frame. They are released exactly once, when the
/// renderer is dropped.
pub struct FrameRenderer<B: GraphicsBackend> {
    backend: B,
    config: RendererConfig,
    resources: Option<GpuResources>,
    applied_viewport: Option<Viewport>,
    warned_invalid_program: bool,
    stats: RenderStats,
}

impl<B: GraphicsBackend> FrameRenderer<B> {
    pub fn new(backend: B, config: RendererConfig) -> Self {
        Self {
            backend,
            config,
            resources: None,
            applied_viewport: None,
            warned_invalid_program: false,
            stats: RenderStats::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn resources(&self) -> Option<&GpuResources> {
        self.resources.as_ref()
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Creates the GPU objects if they do not exist yet.
    ///
    /// Under `FailFast` a shader failure releases what was created and returns
    /// the `ShaderError`; under `LogAndContinue` it is logged and the resources
    /// are kept with an invalid program. Either way shaders are never rebuilt.
    pub fn prepare(&mut self) -> Result<GpuResources> {
        if let Some(resources) = self.resources {
            return Ok(resources);
        }

        ensure!(!self.config.vertices.is_empty(), "renderer has no vertices to draw");
        ensure!(self.config.layout.is_consistent(), "vertex layout is inconsistent");

        let buffer = self.backend.create_vertex_buffer(&self.config.vertices)?;
        let vertex_array = match self.backend.create_vertex_array(buffer, &self.config.layout) {
            Ok(va) => va,
            Err(e) => {
                self.backend.delete_buffer(buffer);
                return Err(e);
            }
        };

        let program = match self.build_program(vertex_array) {
            Ok(program) => program,
            Err(err) => match self.config.failure_policy {
                ShaderFailurePolicy::FailFast => {
                    self.backend.delete_vertex_array(vertex_array);
                    self.backend.delete_buffer(buffer);
                    return Err(err.into());
                }
                ShaderFailurePolicy::LogAndContinue => {
                    log::warn!("continuing without a usable shader program");
                    ProgramHandle::INVALID
                }
            },
        };

        let resources = GpuResources {
            buffer,
            vertex_array,
            program,
            vertex_count: self.config.vertices.len() as u32,
        };
        self.resources = Some(resources);
        self.stats.resource_sets_created += 1;
        log::debug!("gpu resources created: {resources:?}");

        Ok(resources)
    }

    /// Compiles both stages, links them, then deletes the stage objects.
    fn build_program(&mut self, vertex_array: VertexArrayHandle) -> Result<ProgramHandle, ShaderError> {
        let vs = self
            .backend
            .compile_shader(ShaderStage::Vertex, &self.config.shaders.vertex);
        let fs = self
            .backend
            .compile_shader(ShaderStage::Fragment, &self.config.shaders.fragment);

        let mut failure = None;
        for (stage, compile) in [(ShaderStage::Vertex, &vs), (ShaderStage::Fragment, &fs)] {
            if !compile.compiled {
                log::error!("{stage} shader compilation failed:\n{}", compile.log);
                failure.get_or_insert_with(|| ShaderError::compile(stage, compile.log.clone()));
            }
        }

        let result = match failure {
            Some(err) => Err(err),
            None => {
                let link = self.backend.link_program(vs.handle, fs.handle, vertex_array);
                if link.linked && link.handle.is_valid() {
                    Ok(link.handle)
                } else {
                    log::error!("shader program linking failed:\n{}", link.log);
                    Err(ShaderError::link(link.log))
                }
            }
        };

        self.backend.delete_shader(vs.handle);
        self.backend.delete_shader(fs.handle);
        result
    }

    /// Renders one frame into `viewport` and presents it.
    ///
    /// A viewport that differs from the last one is applied before drawing.
    pub fn render_frame(&mut self, viewport: Viewport) -> Result<FrameOutcome> {
        let resources = self.prepare()?;

        if self.applied_viewport != Some(viewport) {
            log::debug!("viewport {}x{}", viewport.width, viewport.height);
            self.backend.set_viewport(viewport);
            self.applied_viewport = Some(viewport);
        }

        if viewport.is_empty() {
            self.stats.frames_skipped += 1;
            return Ok(FrameOutcome::Skipped);
        }

        if self.backend.begin_frame(self.config.clear_color)? == FrameBegin::Skip {
            self.stats.frames_skipped += 1;
            return Ok(FrameOutcome::Skipped);
        }

        if resources.program.is_valid() {
            self.backend.draw(&DrawCall {
                program: resources.program,
                vertex_array: resources.vertex_array,
                topology: PrimitiveTopology::TriangleList,
                vertices: 0..resources.vertex_count,
            });
            self.stats.draw_calls += 1;
        } else if !self.warned_invalid_program {
            log::warn!("no valid shader program; presenting cleared frames only");
            self.warned_invalid_program = true;
        }

        self.backend.present();
        self.stats.frames_presented += 1;
        Ok(FrameOutcome::Presented)
    }

    fn release(&mut self) {
        let Some(resources) = self.resources.take() else { return };
        if resources.program.is_valid() {
            self.backend.delete_program(resources.program);
        }
        self.backend.delete_vertex_array(resources.vertex_array);
        self.backend.delete_buffer(resources.buffer);
        log::debug!("gpu resources released");
    }
}

impl<B: GraphicsBackend> Drop for FrameRenderer<B> {
    fn drop(&mut self) {
        self.release();
    }
}
