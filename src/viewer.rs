use std::time::Instant;

use glutin::dpi::{LogicalSize, PhysicalSize};
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};
use log::{debug, info};

use crate::breakout::{BasicInput, GlutinBreakout};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::scene::{PolygonMode, Scene};
use crate::shader::ShaderProgram;

/// Key that flips between filled and outlined polygons.
pub const POLYGON_MODE_KEY: VirtualKeyCode = VirtualKeyCode::W;

/// Create a core-profile context using glutin, make it current and load the GL symbols.
pub fn init_glutin_context<ET: 'static>(
    config: &Config,
    event_loop: &EventLoop<ET>,
) -> Result<WindowedContext<PossiblyCurrent>> {
    let (width, height) = config.window_size;
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(LogicalSize::new(width, height))
        .with_resizable(config.resizable);

    // glutin requests a forward compatible context on macOS for core profiles
    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, config.gl_version))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(config.vsync)
        .build_windowed(window, event_loop)
        .map_err(|err| Error::Context(err.to_string()))?;

    let context = unsafe { context.make_current() }
        .map_err(|(_, err)| Error::Context(err.to_string()))?;

    gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);
    debug!("OpenGL {}.{} core context ready", config.gl_version.0, config.gl_version.1);

    Ok(context)
}

/// Owns the window, the linked program and the uploaded scene, and drives the render loop.
///
/// Fields drop in declaration order, so GL objects go before the context that owns them.
pub struct ShapeViewer {
    pub scene: Scene,
    pub program: ShaderProgram,
    pub clear_color: [f32; 4],
    started: Instant,
    pub context: WindowedContext<PossiblyCurrent>,
}

impl ShapeViewer {
    /// Opens the window, compiles the configured shaders and uploads `geometry`.
    pub fn new<ET: 'static>(
        config: &Config,
        event_loop: &EventLoop<ET>,
        geometry: &Geometry,
    ) -> Result<Self> {
        let context = init_glutin_context(config, event_loop)?;
        let program = ShaderProgram::from_files(&config.vertex_shader, &config.fragment_shader)?;
        let mut scene = Scene::upload(geometry, config.primitive)?;
        scene.set_polygon_mode(config.polygon_mode);

        let size = context.window().inner_size();
        let mut viewer = ShapeViewer {
            scene,
            program,
            clear_color: config.clear_color,
            started: Instant::now(),
            context,
        };
        viewer.resize_viewport(size);
        Ok(viewer)
    }

    pub fn resize_viewport(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
        unsafe {
            gl::Viewport(0, 0, size.width as _, size.height as _);
        }
    }

    /// Clears, draws every shape once and swaps buffers.
    ///
    /// The program sees the seconds since startup in `u_time` and whether outlines are drawn in
    /// `u_wireframe`; shaders that do not declare them are unaffected.
    pub fn redraw(&mut self) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
        self.program.use_program();
        self.program.set_float("u_time", self.started.elapsed().as_secs_f32());
        self.program
            .set_bool("u_wireframe", self.scene.polygon_mode() == PolygonMode::Line);
        self.scene.draw(&self.program);

        if let Err(err) = self.context.swap_buffers() {
            log::warn!("swap_buffers failed: {}", err);
        }
    }

    /// Runs until the window is closed or Escape is released.
    ///
    /// Everything owned by the viewer is dropped before the loop exits the process.
    pub fn run(self, event_loop: EventLoop<()>) -> ! {
        let mut viewer = Some(self);
        let mut input = BasicInput::default();

        event_loop.run(move |event, _, flow| {
            *flow = ControlFlow::Poll;
            let this = match viewer.as_mut() {
                Some(this) => this,
                None => return,
            };

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => *flow = ControlFlow::Exit,
                    WindowEvent::KeyboardInput {
                        input: KeyboardInput {
                            virtual_keycode: Some(key),
                            state,
                            ..
                        },
                        ..
                    } => {
                        input.set_key(key, state == ElementState::Pressed);
                        if input.key_released(VirtualKeyCode::Escape) {
                            info!("escape pressed, exiting");
                            *flow = ControlFlow::Exit;
                        } else if input.key_pressed(POLYGON_MODE_KEY) {
                            this.scene.toggle_polygon_mode();
                        }
                    }
                    WindowEvent::ModifiersChanged(modifiers) => input.modifiers = modifiers,
                    WindowEvent::Resized(size) => {
                        this.resize_viewport(size);
                        input.resized = true;
                    }
                    _ => {}
                },
                Event::MainEventsCleared => {
                    input.end_frame();
                    this.context.window().request_redraw();
                }
                Event::RedrawRequested(_) => this.redraw(),
                Event::LoopDestroyed => {
                    debug!("event loop destroyed, releasing GL resources");
                    viewer.take();
                }
                _ => {}
            }
        })
    }

    /// Hands the context, program and scene to the caller, who then drives its own loop.
    pub fn glutin_breakout(self) -> GlutinBreakout {
        GlutinBreakout {
            scene: self.scene,
            program: self.program,
            context: self.context,
        }
    }
}
