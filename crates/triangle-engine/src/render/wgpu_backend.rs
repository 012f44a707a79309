use std::borrow::Cow;
use std::collections::HashMap;

use anyhow::{anyhow, ensure, Result};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::paint::Color;
use crate::shader::{compile_glsl, link_stages, CompiledStage, InfoLog, ShaderStage};

use super::backend::{DrawCall, FrameBegin, GraphicsBackend, ProgramLink, ShaderCompile};
use super::handles::{BufferHandle, HandleAllocator, ProgramHandle, ShaderHandle, VertexArrayHandle};
use super::vertex::{PrimitiveTopology, Vertex, VertexLayout};

struct VertexArray {
    buffer: BufferHandle,
    layout: VertexLayout,
}

struct ShaderObject {
    compiled: CompiledStage,
    module: Option<wgpu::ShaderModule>,
}

struct Program {
    pipeline: wgpu::RenderPipeline,
    topology: PrimitiveTopology,
}

/// `GraphicsBackend` on top of a wgpu device and window surface.
///
/// A vertex array is a buffer plus its layout; a program is a render pipeline
/// built for that layout and the surface format.
pub struct WgpuBackend<'w> {
    window: &'w Window,
    gpu: Gpu<'w>,
    ids: HandleAllocator,

    buffers: HashMap<BufferHandle, wgpu::Buffer>,
    vertex_arrays: HashMap<VertexArrayHandle, VertexArray>,
    shaders: HashMap<ShaderHandle, ShaderObject>,
    programs: HashMap<ProgramHandle, Program>,

    viewport: Viewport,
    frame: Option<GpuFrame>,
}

impl<'w> WgpuBackend<'w> {
    /// Creates the GPU context for `window`, blocking on adapter/device setup.
    pub fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let gpu = pollster::block_on(Gpu::new(window, init))?;

        let info = gpu.adapter_info();
        log::info!(
            "using {} ({:?}, {:?}), surface format {:?}",
            info.name,
            info.backend,
            info.device_type,
            gpu.surface_format()
        );

        Ok(Self {
            window,
            viewport: gpu.size().into(),
            gpu,
            ids: HandleAllocator::default(),
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            frame: None,
        })
    }

    fn build_pipeline(
        &self,
        vs: &wgpu::ShaderModule,
        fs: &wgpu::ShaderModule,
        layout: &VertexLayout,
    ) -> std::result::Result<wgpu::RenderPipeline, wgpu::Error> {
        let attributes = layout.wgpu_attributes();

        let format = self.gpu.surface_format();

        self.gpu.validated(|device| {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("triangle pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("triangle pipeline"),
                layout: Some(&pipeline_layout),

                // GLSL modules carry exactly one entry point, so wgpu picks it.
                vertex: wgpu::VertexState {
                    module: vs,
                    entry_point: None,
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: layout.stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                },

                fragment: Some(wgpu::FragmentState {
                    module: fs,
                    entry_point: None,
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: PrimitiveTopology::TriangleList.to_wgpu(),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })
    }
}

impl GraphicsBackend for WgpuBackend<'_> {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.gpu.resize(viewport.into());
    }

    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> Result<BufferHandle> {
        ensure!(!vertices.is_empty(), "vertex buffer needs at least one vertex");

        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("triangle vbo"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let handle = BufferHandle(self.ids.next());
        self.buffers.insert(handle, buffer);
        Ok(handle)
    }

    fn create_vertex_array(
        &mut self,
        buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> Result<VertexArrayHandle> {
        ensure!(self.buffers.contains_key(&buffer), "unknown buffer {buffer:?}");
        ensure!(layout.is_consistent(), "inconsistent vertex layout {layout:?}");

        let handle = VertexArrayHandle(self.ids.next());
        self.vertex_arrays.insert(
            handle,
            VertexArray {
                buffer,
                layout: layout.clone(),
            },
        );
        Ok(handle)
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderCompile {
        let compiled = compile_glsl(stage, source);

        let mut rejected = None;
        let module = compiled.module().and_then(|ir| {
            let created = self.gpu.validated(|device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(match stage {
                        ShaderStage::Vertex => "triangle vertex shader",
                        ShaderStage::Fragment => "triangle fragment shader",
                    }),
                    source: wgpu::ShaderSource::Naga(Cow::Owned(ir.clone())),
                })
            });
            created
                .map_err(|err| {
                    rejected = Some(InfoLog::bounded(format!(
                        "{stage} shader rejected by device: {err}"
                    )));
                })
                .ok()
        });

        let handle = ShaderHandle(self.ids.next());
        let out = match rejected {
            Some(log) => ShaderCompile {
                handle,
                compiled: false,
                log,
            },
            None => ShaderCompile {
                handle,
                compiled: compiled.compiled,
                log: compiled.log.clone(),
            },
        };
        self.shaders.insert(handle, ShaderObject { compiled, module });
        out
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
        vertex_array: VertexArrayHandle,
    ) -> ProgramLink {
        let (Some(vs), Some(fs)) = (self.shaders.get(&vertex), self.shaders.get(&fragment)) else {
            return ProgramLink::failed(InfoLog::bounded("unknown shader handle"));
        };
        let Some(va) = self.vertex_arrays.get(&vertex_array) else {
            return ProgramLink::failed(InfoLog::bounded("unknown vertex array handle"));
        };

        if let Err(log) = link_stages(&vs.compiled, &fs.compiled, &va.layout) {
            return ProgramLink::failed(log);
        }
        let (Some(vs_module), Some(fs_module)) = (&vs.module, &fs.module) else {
            return ProgramLink::failed(InfoLog::bounded("shader stage has no GPU module"));
        };

        let pipeline = match self.build_pipeline(vs_module, fs_module, &va.layout) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                return ProgramLink::failed(InfoLog::bounded(format!(
                    "render pipeline rejected by device: {err}"
                )));
            }
        };
        let handle = ProgramHandle(self.ids.next());
        self.programs.insert(
            handle,
            Program {
                pipeline,
                topology: PrimitiveTopology::TriangleList,
            },
        );

        ProgramLink {
            handle,
            linked: true,
            log: InfoLog::default(),
        }
    }

    fn begin_frame(&mut self, clear: Color) -> Result<FrameBegin> {
        // A frame left open by a skipped present is dropped unpresented.
        self.frame = None;

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("surface error: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(anyhow!("surface is unrecoverable (out of memory)")),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(FrameBegin::Skip)
                    }
                };
            }
        };

        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("triangle clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.frame = Some(frame);
        Ok(FrameBegin::Ready)
    }

    fn draw(&mut self, call: &DrawCall) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("draw outside of a frame ignored");
            return;
        };
        let Some(program) = self.programs.get(&call.program) else {
            log::warn!("draw with unknown program {:?} ignored", call.program);
            return;
        };
        let Some(buffer) = self
            .vertex_arrays
            .get(&call.vertex_array)
            .and_then(|va| self.buffers.get(&va.buffer))
        else {
            log::warn!("draw with unknown vertex array {:?} ignored", call.vertex_array);
            return;
        };
        if program.topology != call.topology {
            log::warn!("draw topology {:?} does not match program", call.topology);
            return;
        }

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(
            0.0,
            0.0,
            self.viewport.width as f32,
            self.viewport.height as f32,
            0.0,
            1.0,
        );
        rpass.set_pipeline(&program.pipeline);
        rpass.set_vertex_buffer(0, buffer.slice(..));
        rpass.draw(call.vertices.clone(), 0..1);
    }

    fn present(&mut self) {
        let Some(frame) = self.frame.take() else { return };
        self.window.pre_present_notify();
        self.gpu.submit(frame);
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.shaders.remove(&shader);
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program);
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array);
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buffer) = self.buffers.remove(&buffer) {
            buffer.destroy();
        }
    }
}

