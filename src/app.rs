use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::texture_atlas::Atlas;
use crate::utils::Position;
use crate::wgpu_backend::WgpuBackend;

pub type SapRenderer = Renderer<WgpuBackend<'static>>;

/// Per-frame input handed to the frame callback.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub delta_time: f32,
    pub elapsed: f32,
    /// Cursor in logical pixels, `None` until the cursor enters the window.
    pub mouse_position: Option<Position>,
    /// Window size in logical pixels.
    pub size: (u32, u32),
}

type FrameCallback = Box<dyn FnMut(&mut SapRenderer, &FrameContext) -> Result<(), RenderError>>;

pub struct SapApp {
    config: RenderConfig,
    renderer: Option<SapRenderer>,
    window: Option<Arc<Window>>,
    started: Instant,
    last_frame: Instant,
    frame_callback: FrameCallback,
    frame_context: FrameContext,
    error: Option<RenderError>,
}

impl SapApp {
    pub fn new<F>(config: RenderConfig, frame_callback: F) -> Self
    where
        F: FnMut(&mut SapRenderer, &FrameContext) -> Result<(), RenderError> + 'static,
    {
        let now = Instant::now();
        Self {
            frame_context: FrameContext {
                delta_time: 0.0,
                elapsed: 0.0,
                mouse_position: None,
                size: (config.width, config.height),
            },
            config,
            renderer: None,
            window: None,
            started: now,
            last_frame: now,
            frame_callback: Box::new(frame_callback),
            error: None,
        }
    }

    pub fn renderer(&mut self) -> Option<&mut SapRenderer> {
        self.renderer.as_mut()
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RenderError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;
        let size = window.inner_size();
        let scale = window.scale_factor() as f32;

        let backend = WgpuBackend::new(
            &instance,
            surface,
            size.width,
            size.height,
            scale,
            self.config.vsync,
            self.config.batch_capacity,
        )?;
        let renderer = Renderer::new(backend, Atlas::build()?, self.config.batch_capacity)?;

        self.frame_context.size = logical_size(size.width, size.height, scale);
        self.renderer = Some(renderer);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), RenderError> {
        let now = Instant::now();
        self.frame_context.delta_time = (now - self.last_frame).as_secs_f32();
        self.frame_context.elapsed = (now - self.started).as_secs_f32();
        self.last_frame = now;

        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        renderer.begin_frame();
        renderer.clear(self.config.clear_color)?;
        (self.frame_callback)(renderer, &self.frame_context)?;
        renderer.end_frame()?;

        if let Some(window) = &self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }
}

fn logical_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    (
        (width as f32 / scale).round() as u32,
        (height as f32 / scale).round() as u32,
    )
}

impl ApplicationHandler<()> for SapApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.frame_context.mouse_position = Some(Position {
                    x: (position.x / scale) as i32,
                    y: (position.y / scale) as i32,
                });
            }
            WindowEvent::CursorLeft { .. } => {
                self.frame_context.mouse_position = None;
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            WindowEvent::Resized(new_size) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor() as f32);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
                self.frame_context.size = logical_size(new_size.width, new_size.height, scale);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.backend_mut().set_scale_factor(scale_factor as f32);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            _ => (),
        }
    }
}

/// Opens a window and calls `frame_callback` once per frame between the
/// clear and the present.
pub fn run_app<F>(config: RenderConfig, frame_callback: F) -> Result<(), RenderError>
where
    F: FnMut(&mut SapRenderer, &FrameContext) -> Result<(), RenderError> + 'static,
{
    let event_loop = EventLoop::new()?;
    let mut app = SapApp::new(config, frame_callback);

    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
