//! Frame driver and application event loop.
//!
//! A sketch implements [`SketchFlow`]. [`run`] opens a window, builds the
//! GPU [`Context`], hands an [`InitContext`] to the sketch constructor and
//! then drives the sketch once per redraw.
//!
//! # Lifecycle
//!
//! 1. `on_init()` once the sketch is built; configure the context here
//! 2. `on_resize()` after init and on every window resize
//! 3. per frame: camera controls are applied, `on_update()` receives the
//!    elapsed [`Frame`] time, then `on_render()` is drawn and presented
//! 4. `on_unload()` when the window closes, before GPU resources are dropped

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

#[cfg(feature = "integration-tests")]
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext},
    data_structures::{colour::Colour, model::DrawModel, texture::Texture},
    render::{Flat, Instanced, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Kind of drawing context a sketch asks for.
///
/// Only a hardware accelerated 3D context is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextKind {
    #[default]
    Webgpu,
}

/// Initial settings of a sketch run.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Redraw continuously with advancing time. When off, time stays 0.
    pub animate: bool,
    pub context: ContextKind,
    pub clear_colour: Colour,
    pub title: String,
    /// Logical window size; the platform default when `None`.
    pub dimensions: Option<(u32, u32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animate: true,
            context: ContextKind::Webgpu,
            clear_colour: Colour::WHITE,
            title: "flow-sketch".to_string(),
            dimensions: None,
        }
    }
}

/// Size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pixel_ratio: f64,
    /// Physical pixels.
    pub width: u32,
    pub height: u32,
}

/// What a sketch gets every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Seconds since the sketch started.
    pub time: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    pub viewport: Viewport,
}

impl Viewport {
    /// The viewport at a new pixel ratio, if the ratio changed.
    pub fn rescaled(self, pixel_ratio: f64) -> Option<Viewport> {
        (pixel_ratio != self.pixel_ratio).then_some(Viewport {
            pixel_ratio,
            ..self
        })
    }
}

/// Elapsed sketch time for a frame.
pub fn frame_time(animate: bool, since_start: Duration) -> f32 {
    if animate { since_start.as_secs_f32() } else { 0.0 }
}

///
/// Output of every lifecycle hook.
///
/// `Out::Configure` modifies the Context at runtime, for instance to change
/// the clear colour or move the camera.
///
/// `Out::Exit` closes the window and unloads the sketch.
///
/// `Empty` is the default output when nothing needs to happen.
///
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Exit,
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// A sketch: a scene that is set up once and redrawn from elapsed time.
pub trait SketchFlow {
    /// Called once after construction. The only hook with mutable access to
    /// the Context.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    /// The drawing surface changed size or pixel ratio.
    fn on_resize(&mut self, ctx: &Context, viewport: Viewport) -> Out;

    /// Advance to `frame.time`: push time uniforms, recompute time driven
    /// transforms and upload buffers.
    fn on_update(&mut self, ctx: &Context, frame: Frame) -> Out;

    /// Window events (after the camera controls have seen them).
    fn on_window_events(&mut self, _ctx: &Context, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    /// What to draw this frame.
    fn on_render(&self) -> Render<'_>;

    /// Release sketch resources. Called once when the run ends.
    fn on_unload(&mut self, _ctx: &Context) {}

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _frame: &Frame,
        _texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        Ok(ImageTestResult::Passed)
    }
}

// Dummy impl to make wasm work
impl Debug for dyn SketchFlow + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SketchFlow")
    }
}

/// Builds a sketch from the rendering handle.
pub type SketchConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn SketchFlow>>>>>,
>;

/// Application state bundle: GPU context and surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window).await?;
        ctx.clear_colour = settings.clear_colour.to_wgpu();
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            pixel_ratio: self.ctx.pixel_ratio,
            width: self.ctx.config.width,
            height: self.ctx.config.height,
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Option<Viewport> {
        if width == 0 || height == 0 {
            return None;
        }
        self.ctx.config.width = width;
        self.ctx.config.height = height;
        self.ctx.pixel_ratio = self.ctx.window.scale_factor();
        self.is_surface_configured = true;
        self.ctx.projection.resize(width, height);
        self.ctx
            .surface
            .configure(&self.ctx.device, &self.ctx.config);
        self.ctx.depth_texture = Texture::create_depth_texture(
            &self.ctx.device,
            [self.ctx.config.width, self.ctx.config.height],
            "depth_texture",
        );
        log::debug!("resized to {width}x{height}");
        Some(self.viewport())
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.ctx.config.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_depth_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Depth Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Texture::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    /// Readback rows must be a multiple of 256 bytes, so the test target is
    /// widened to the next multiple of 64 pixels.
    #[cfg(feature = "integration-tests")]
    fn get_with_height(&self) -> (u32, u32) {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT / 4;
        let width = self.ctx.config.width.div_ceil(align) * align;
        (width, self.ctx.config.height)
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_3d_extent(&self) -> wgpu::Extent3d {
        let (width, height) = self.get_with_height();
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        }
    }

    fn render(
        &mut self,
        sketch: &dyn SketchFlow,
        #[cfg(feature = "integration-tests")] frame: &Frame,
        #[cfg(feature = "integration-tests")] async_runtime: &Runtime,
        #[cfg(feature = "integration-tests")] proxy: &winit::event_loop::EventLoopProxy<FlowEvent>,
    ) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        #[cfg(not(feature = "integration-tests"))]
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "integration-tests")]
        let (tex, depth) = {
            let extent3d = self.get_test_3d_extent();
            let tex = self.get_test_texture(extent3d);
            let depth = self.get_test_depth_texture(extent3d);
            (tex, depth)
        };

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        #[cfg(feature = "integration-tests")]
                        view: &tex.create_view(&wgpu::TextureViewDescriptor::default()),
                        #[cfg(not(feature = "integration-tests"))]
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        #[cfg(feature = "integration-tests")]
                        view: &depth.create_view(&wgpu::TextureViewDescriptor::default()),
                        #[cfg(not(feature = "integration-tests"))]
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                });

            let mut basics: Vec<Instanced> = Vec::new();
            let mut lines: Vec<Flat> = Vec::new();
            sketch
                .on_render()
                .set_pipelines(&mut basics, &mut lines);

            if !lines.is_empty() {
                render_pass.set_pipeline(&self.ctx.lines_pipeline);
                render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
                for flat in lines {
                    render_pass.set_vertex_buffer(0, flat.vertex.slice(..));
                    render_pass.draw(0..flat.amount as u32, 0..1);
                }
            }

            for instanced in basics {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("you attempted to render something with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                );
            }
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let (width, height) = self.get_with_height();
            let output_buffer_size = (u32_size * width * height) as wgpu::BufferAddress;
            let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                size: output_buffer_size,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: Some("Golden Image Readback"),
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &tex,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * width),
                        rows_per_image: Some(height),
                    },
                },
                self.get_test_3d_extent(),
            );
            output_buffer
        };

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        {
            let fut_img = async {
                let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
                let buffer_slice = output_buffer.slice(..);
                buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                    tx.send(result).unwrap();
                });
                self.ctx
                    .device
                    .poll(wgpu::PollType::Wait {
                        submission_index: None,
                        timeout: Some(Duration::from_secs(3)),
                    })
                    .unwrap();
                rx.receive().await.unwrap().unwrap();
                let data = buffer_slice.get_mapped_range();
                let (width, height) = self.get_with_height();
                image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(width, height, data).unwrap()
            };
            let mut img: image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView> =
                async_runtime.block_on(fut_img);
            let passed = match sketch.render_to_texture(&self.ctx, frame, &mut img) {
                Err(e) => panic!("{}", e),
                Ok(ImageTestResult::Passed) => true,
                Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                Ok(ImageTestResult::Waiting) => false,
            };
            if passed {
                proxy
                    .send_event(FlowEvent::Exit)
                    .expect("All assertions passed but the winit event-loop could not safely exit")
            }
        }

        output.present();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    settings: Settings,
    state: Option<AppState>,
    sketch: Option<Box<dyn SketchFlow>>,
    // Taken once the window exists.
    constructor: Option<SketchConstructor>,
    start: Instant,
    last_time: Instant,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        settings: Settings,
        constructor: SketchConstructor,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            settings,
            state: None,
            sketch: None,
            constructor: Some(constructor),
            start: Instant::now(),
            last_time: Instant::now(),
        })
    }

    /// Hand the built sketch its context and first viewport.
    fn start_sketch(&mut self, mut app_state: AppState, mut sketch: Box<dyn SketchFlow>) {
        let out = sketch.on_init(&mut app_state.ctx);
        handle_flow_output(&mut app_state.ctx, &self.proxy, out);

        let size = app_state.ctx.window.inner_size();
        if let Some(viewport) = app_state.resize(size.width, size.height) {
            let out = sketch.on_resize(&app_state.ctx, viewport);
            handle_flow_output(&mut app_state.ctx, &self.proxy, out);
        }
        app_state.ctx.window.request_redraw();

        self.start = Instant::now();
        self.last_time = self.start;
        self.state = Some(app_state);
        self.sketch = Some(sketch);
    }

    /// Unload the sketch and drop every GPU resource. Safe to call twice.
    fn unload(&mut self) {
        if let (Some(state), Some(sketch)) = (&mut self.state, &mut self.sketch) {
            log::info!("unloading sketch");
            sketch.on_unload(&state.ctx);
            state.ctx.camera.controller.dispose();
        }
        self.sketch = None;
        self.state = None;
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized {
        state: AppState,
        sketch: Box<dyn SketchFlow>,
    },
    #[allow(dead_code)]
    Failed(String),
    Exit,
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, sketch } => {
                f.debug_struct("Initialized").field("sketch", sketch).finish()
            }
            Self::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructor) = self.constructor.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.settings.title);
        if let Some((width, height)) = self.settings.dimensions {
            window_attributes =
                window_attributes.with_inner_size(winit::dpi::LogicalSize::new(width, height));
        }

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create a window: {e}");
                event_loop.exit();
                return;
            }
        };

        let settings = self.settings.clone();
        let init_future = async move {
            let app_state = AppState::new(window, &settings).await?;
            let sketch = constructor((&app_state.ctx).into()).await?;
            anyhow::Ok((app_state, sketch))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((app_state, sketch)) => self.start_sketch(app_state, sketch),
                Err(e) => {
                    log::error!("sketch initialization failed: {e:#}");
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, sketch)) => FlowEvent::Initialized { state, sketch },
                    Err(e) => FlowEvent::Failed(format!("{e:#}")),
                };
                assert!(proxy.send_event(event).is_ok());
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized { state, sketch } => {
                // This is the message from our wasm `spawn_local`
                self.start_sketch(state, sketch);
            }
            FlowEvent::Failed(reason) => {
                log::error!("sketch initialization failed: {reason}");
                event_loop.exit();
            }
            FlowEvent::Exit => {
                self.unload();
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (Some(state), Some(sketch)) = (&mut self.state, &mut self.sketch) else {
            return;
        };

        if state.ctx.camera.controller.handle_window_events(&event) && !self.settings.animate {
            state.ctx.window.request_redraw();
        }

        let out = sketch.on_window_events(&state.ctx, &event);
        handle_flow_output(&mut state.ctx, &self.proxy, out);

        match event {
            WindowEvent::CloseRequested => {
                self.unload();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(viewport) = state.resize(size.width, size.height) {
                    let out = sketch.on_resize(&state.ctx, viewport);
                    handle_flow_output(&mut state.ctx, &self.proxy, out);
                    state.ctx.window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // A Resized event follows only when the physical size changes.
                if let Some(viewport) = state.viewport().rescaled(scale_factor) {
                    state.ctx.pixel_ratio = scale_factor;
                    if state.is_surface_configured {
                        let out = sketch.on_resize(&state.ctx, viewport);
                        handle_flow_output(&mut state.ctx, &self.proxy, out);
                        state.ctx.window.request_redraw();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if self.settings.animate || cfg!(feature = "integration-tests") {
                    state.ctx.window.request_redraw();
                }
                let now = Instant::now();
                let delta = now.duration_since(self.last_time);
                self.last_time = now;
                let frame = Frame {
                    time: frame_time(self.settings.animate, now.duration_since(self.start)),
                    delta: if self.settings.animate { delta.as_secs_f32() } else { 0.0 },
                    viewport: state.viewport(),
                };

                state.ctx.camera.update(&state.ctx.queue, &state.ctx.projection);
                let out = sketch.on_update(&state.ctx, frame);
                handle_flow_output(&mut state.ctx, &self.proxy, out);

                match state.render(
                    sketch.as_ref(),
                    #[cfg(feature = "integration-tests")]
                    &frame,
                    #[cfg(feature = "integration-tests")]
                    &self.async_runtime,
                    #[cfg(feature = "integration-tests")]
                    &self.proxy,
                ) {
                    Ok(_) => (),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unload();
    }
}

fn handle_flow_output(
    ctx: &mut Context,
    proxy: &winit::event_loop::EventLoopProxy<FlowEvent>,
    out: Out,
) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Exit => {
            if let Err(e) = proxy.send_event(FlowEvent::Exit) {
                log::error!("event loop closed before the sketch could exit: {e}");
            }
        }
        Out::Empty => (),
    }
}

/// Run one sketch until its window closes.
pub fn run(settings: Settings, constructor: SketchConstructor) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    log::info!("starting {} ({:?})", settings.title, settings.context);

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(not(feature = "integration-tests"))]
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, settings, constructor)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_sketches_stay_at_time_zero() {
        assert_eq!(frame_time(false, Duration::from_secs(12)), 0.0);
    }

    #[test]
    fn animated_time_is_seconds_since_start() {
        assert_eq!(frame_time(true, Duration::from_millis(2500)), 2.5);
    }

    #[test]
    fn new_pixel_ratio_keeps_physical_size() {
        let viewport = Viewport {
            pixel_ratio: 1.0,
            width: 800,
            height: 600,
        };
        let rescaled = viewport.rescaled(2.0).unwrap();
        assert_eq!(rescaled.pixel_ratio, 2.0);
        assert_eq!((rescaled.width, rescaled.height), (800, 600));
        assert_eq!(viewport.rescaled(1.0), None);
    }

    #[test]
    fn default_settings_animate_on_white() {
        let settings = Settings::default();
        assert!(settings.animate);
        assert_eq!(settings.context, ContextKind::Webgpu);
        assert_eq!(settings.clear_colour, Colour::WHITE);
    }
}
