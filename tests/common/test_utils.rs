#[cfg(feature = "integration-tests")]
use flow_sketch::{
    context::Context,
    flow::{Frame, ImageTestResult, Out, SketchFlow, Viewport},
    render::Render,
};

/// Lifecycle bookkeeping shared between a test sketch and the test body.
#[derive(Debug, Default)]
pub(crate) struct State {
    init_invocations: u32,
    resize_invocations: u32,
    update_invocations: u32,
    unload_invocations: u32,
    pub times: Vec<f32>,
}

impl State {
    pub fn init(&mut self) {
        self.init_invocations += 1;
    }

    pub fn resize(&mut self) {
        self.resize_invocations += 1;
    }

    pub fn update(&mut self, time: f32) {
        self.update_invocations += 1;
        self.times.push(time);
    }

    pub fn unload(&mut self) {
        self.unload_invocations += 1;
    }

    pub fn init_invocations(&self) -> u32 {
        self.init_invocations
    }

    pub fn resize_invocations(&self) -> u32 {
        self.resize_invocations
    }

    pub fn update_invocations(&self) -> u32 {
        self.update_invocations
    }

    pub fn unload_invocations(&self) -> u32 {
        self.unload_invocations
    }
}

#[derive(Debug, Default)]
pub(crate) struct FrameCounter(pub(crate) u32);

impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

#[cfg(feature = "integration-tests")]
pub(crate) type Validate = Box<
    dyn Fn(
        &Context,
        &FrameCounter,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

/// Wraps a sketch and checks every rendered frame with `validate`.
#[cfg(feature = "integration-tests")]
pub(crate) struct ImageTest {
    sketch: Box<dyn SketchFlow>,
    setup: Box<dyn Fn(&mut Context)>,
    frames: FrameCounter,
    validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl ImageTest {
    pub(crate) fn new(sketch: impl SketchFlow + 'static, validate: Validate) -> Self {
        Self {
            sketch: Box::new(sketch),
            setup: Box::new(|_| ()),
            frames: FrameCounter::default(),
            validate,
        }
    }

    /// Runs after the wrapped sketch's own `on_init`.
    pub(crate) fn with_setup(mut self, setup: impl Fn(&mut Context) + 'static) -> Self {
        self.setup = Box::new(setup);
        self
    }
}

#[cfg(feature = "integration-tests")]
impl SketchFlow for ImageTest {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        let out = self.sketch.on_init(ctx);
        (self.setup)(ctx);
        out
    }

    fn on_resize(&mut self, ctx: &Context, viewport: Viewport) -> Out {
        self.sketch.on_resize(ctx, viewport)
    }

    fn on_update(&mut self, ctx: &Context, frame: Frame) -> Out {
        self.frames.progress();
        self.sketch.on_update(ctx, frame)
    }

    fn on_render(&self) -> Render<'_> {
        self.sketch.on_render()
    }

    fn on_unload(&mut self, ctx: &Context) {
        self.sketch.on_unload(ctx)
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        _: &Frame,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, &self.frames, texture)
    }
}

/// Pixel covering `world` in the read back texture.
///
/// The render target is the whole (row-padded) texture, so clip space maps
/// onto the texture size rather than the window size.
#[cfg(feature = "integration-tests")]
pub(crate) fn pixel_of(ctx: &Context, size: (u32, u32), world: cgmath::Vector3<f32>) -> (u32, u32) {
    let view_proj = ctx.projection.calc_matrix() * ctx.camera.camera.calc_matrix();
    let clip = view_proj * world.extend(1.0);
    let (x, y) = (clip.x / clip.w, clip.y / clip.w);
    let px = ((x + 1.0) * 0.5 * size.0 as f32).floor();
    let py = ((1.0 - y) * 0.5 * size.1 as f32).floor();
    (
        (px.max(0.0) as u32).min(size.0 - 1),
        (py.max(0.0) as u32).min(size.1 - 1),
    )
}

/// Red, green and blue of a pixel regardless of the surface channel order.
#[cfg(feature = "integration-tests")]
pub(crate) fn rgb_at(
    ctx: &Context,
    texture: &image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    (x, y): (u32, u32),
) -> [u8; 3] {
    let [a, g, b, _] = texture.get_pixel(x, y).0;
    match ctx.config.format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => [b, g, a],
        _ => [a, g, b],
    }
}

#[cfg(feature = "integration-tests")]
pub(crate) fn assert_colour_near(actual: [u8; 3], expected: cgmath::Vector3<f32>, what: &str) {
    const TOLERANCE: i32 = 10;
    let expected = [expected.x, expected.y, expected.z].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as i32);
    let close = actual
        .iter()
        .zip(expected)
        .all(|(&a, e)| (a as i32 - e).abs() <= TOLERANCE);
    assert!(close, "{what}: drew {actual:?}, expected about {expected:?}");
}

/// Runs a sketch built by `$build` (a closure from `InitContext` to a future
/// of `anyhow::Result<impl SketchFlow>`) until its checks pass.
#[macro_export]
macro_rules! golden_image_test {
    ($settings:expr, $build:expr) => {{
        use flow_sketch::{
            context::InitContext,
            flow::{SketchConstructor, SketchFlow},
        };
        use std::{future::Future, pin::Pin};

        let build = $build;
        let constructor: SketchConstructor = Box::new(move |ctx: InitContext| {
            let built: Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn SketchFlow>>>>> =
                Box::pin(async move {
                    let sketch: Box<dyn SketchFlow> = Box::new(build(ctx).await?);
                    Ok(sketch)
                });
            built
        });

        flow_sketch::flow::run($settings, constructor)
            .expect("Failed to run sketch for integration test.");
    }};
}
