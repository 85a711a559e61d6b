// winit allows one event loop per process, so this file runs one sketch.
#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

#[cfg(feature = "integration-tests")]
mod lifecycle {
    use std::{cell::RefCell, rc::Rc};

    use flow_sketch::{
        context::{Context, InitContext},
        flow::{Frame, ImageTestResult, Out, Settings, SketchFlow, Viewport},
        render::Render,
    };

    use crate::common::test_utils::State;
    use crate::golden_image_test;

    /// Asks to exit after `frames` updates.
    struct CountingSketch {
        state: Rc<RefCell<State>>,
        frames: u32,
    }

    impl SketchFlow for CountingSketch {
        fn on_init(&mut self, _: &mut Context) -> Out {
            let mut state = self.state.borrow_mut();
            assert_eq!(state.init_invocations(), 0);
            assert_eq!(state.update_invocations(), 0);
            state.init();
            Out::Configure(Box::new(|ctx: &mut Context| {
                ctx.clear_colour = wgpu::Color::BLACK;
            }))
        }

        fn on_resize(&mut self, _: &Context, viewport: Viewport) -> Out {
            assert!(viewport.width > 0 && viewport.height > 0);
            assert!(viewport.pixel_ratio > 0.0);
            self.state.borrow_mut().resize();
            Out::Empty
        }

        fn on_update(&mut self, ctx: &Context, frame: Frame) -> Out {
            let mut state = self.state.borrow_mut();
            assert_eq!(state.init_invocations(), 1);
            assert!(state.resize_invocations() >= 1, "resize precedes the first frame");
            assert_eq!(ctx.clear_colour, wgpu::Color::BLACK);
            assert_eq!(frame.viewport.width, ctx.config.width);
            state.update(frame.time);
            if state.update_invocations() >= self.frames {
                Out::Exit
            } else {
                Out::Empty
            }
        }

        fn on_render(&self) -> Render<'_> {
            Render::None
        }

        fn on_unload(&mut self, _: &Context) {
            self.state.borrow_mut().unload();
        }

        fn render_to_texture(
            &self,
            _: &Context,
            _: &Frame,
            _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            Ok(ImageTestResult::Waiting)
        }
    }

    fn run_counting_sketch(settings: Settings, frames: u32) -> State {
        let state = Rc::new(RefCell::new(State::default()));
        let shared = state.clone();
        golden_image_test!(settings, move |_: InitContext| async move {
            anyhow::Ok(CountingSketch {
                state: shared,
                frames,
            })
        });
        Rc::try_unwrap(state)
            .expect("sketch was not dropped after the run")
            .into_inner()
    }

    #[test]
    fn hooks_run_in_order_and_unload_once() {
        let state = run_counting_sketch(Settings::default(), 5);
        assert_eq!(state.init_invocations(), 1);
        assert!(state.update_invocations() >= 5);
        assert_eq!(state.unload_invocations(), 1);
        assert!(state.times.windows(2).all(|w| w[0] <= w[1]), "{:?}", state.times);
    }
}
