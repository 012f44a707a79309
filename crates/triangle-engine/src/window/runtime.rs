use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{run_iteration, LoopControl};
use crate::device::GpuInit;
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputState, KeyBindings};
use crate::render::{FrameRenderer, RendererConfig, WgpuBackend};
use crate::time::FrameClock;

use super::error::HostError;
use super::host::Host;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Inner size in physical pixels; the initial viewport matches it exactly.
    pub size: PhysicalSize<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Hello Triangle".to_string(),
            size: PhysicalSize::new(800, 600),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, renders until close is requested, then releases
    /// every GPU object.
    ///
    /// Setup failures and unrecoverable frame errors are returned as `Err`.
    pub fn run(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        renderer: RendererConfig,
        bindings: KeyBindings,
    ) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(HostError::from)
            .context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, renderer, bindings);

        event_loop
            .run_app(&mut state)
            .map_err(HostError::from)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    host: Host,
    input: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    renderer: FrameRenderer<WgpuBackend<'this>>,
}

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    renderer_config: RendererConfig,
    bindings: KeyBindings,

    entry: Option<WindowEntry>,
    fatal: Option<anyhow::Error>,
    started: bool,
}

impl AppState {
    fn new(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        renderer_config: RendererConfig,
        bindings: KeyBindings,
    ) -> Self {
        Self {
            config,
            gpu_init,
            renderer_config,
            bindings,
            entry: None,
            fatal: None,
            started: false,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size);

        let window = event_loop
            .create_window(attrs)
            .map_err(HostError::from)
            .context("window creation failed")?;

        let size = self.config.size;
        let mut host = Host::new(size.width, size.height);
        host.on_resize(|vp| log::info!("viewport is now {}x{}", vp.width, vp.height));

        let gpu_init = self.gpu_init.clone();
        let renderer_config = self.renderer_config.clone();

        WindowEntryTryBuilder {
            host,
            input: InputState::default(),
            clock: FrameClock::default(),
            window,
            renderer_builder: |w| -> Result<_> {
                let backend = WgpuBackend::new(w, gpu_init)
                    .map_err(HostError::ContextCreation)
                    .context("graphics context creation failed")?;
                let mut renderer = FrameRenderer::new(backend, renderer_config);
                renderer.prepare()?;
                Ok(renderer)
            },
        }
        .try_build()
    }

    /// Drops the window entry (releasing GPU objects) and stops the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.entry.take() {
            let stats = entry.borrow_renderer().stats();
            log::info!(
                "shutting down after {} frames ({} skipped)",
                stats.frames_presented,
                stats.frames_skipped
            );
            drop(entry);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.fatal = Some(err);
        self.shutdown(event_loop);
    }

    fn redraw(&mut self) -> Result<LoopControl> {
        let bindings = &self.bindings;
        let Some(entry) = self.entry.as_mut() else {
            return Ok(LoopControl::Exit);
        };

        entry.with_mut(|fields| -> Result<LoopControl> {
            fields.clock.tick();
            let (control, _) =
                run_iteration(fields.host, bindings, &*fields.input, fields.renderer)?;

            if let Some(s) = fields.clock.take_summary() {
                log::debug!(
                    "{} frames, avg {:.2} ms ({:.1} fps)",
                    s.frames,
                    s.avg_frame_ms,
                    s.fps
                );
            }
            Ok(control)
        })
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Resources are created once; a later resume reuses them.
        if self.started {
            return;
        }
        self.started = true;

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                log::info!(
                    "window \"{}\" created at {}x{}",
                    self.config.title,
                    self.config.size.width,
                    self.config.size.height
                );
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_ref() else {
            return;
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        entry.with_window(|w| w.request_redraw());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if let Some(ev) = translate_window_event(&event) {
            entry.with_input_mut(|input| input.apply_event(&ev));
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested by window manager");
                entry.with_host_mut(|host| host.request_close());
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_host_mut(|host| host.handle_resize((*new_size).into()));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_host_mut(|host| host.handle_resize(size.into()));
            }

            WindowEvent::Focused(true) => {
                entry.with_clock_mut(|clock| clock.reset());
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => self.shutdown(event_loop),
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}
