use std::path::PathBuf;

use derive_builder::Builder;

use crate::scene::{PolygonMode, Primitive};

/// Everything the viewer needs to open a window and build its pipeline.
///
/// Either use the [`config!`][crate::config] macro, struct update syntax, or the generated
/// [`ConfigBuilder`]:
///
/// ```
/// use mini_gl_shapes::{Config, ConfigBuilder};
///
/// let config: Config = ConfigBuilder::default()
///     .window_title("Countries")
///     .window_size((1024.0, 768.0))
///     .build()
///     .unwrap();
/// assert!(config.resizable);
/// ```
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(setter(into), default)]
pub struct Config {
    pub window_title: String,
    /// Logical size of the window.
    pub window_size: (f64, f64),
    pub resizable: bool,
    pub vsync: bool,
    /// Requested core profile version, `(major, minor)`.
    pub gl_version: (u8, u8),
    pub clear_color: [f32; 4],
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// Side of the square the geometry is fitted into. 2.0 fills device coordinates.
    pub target_size: f64,
    pub primitive: Primitive,
    pub polygon_mode: PolygonMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            window_title: "mini_gl_shapes".to_string(),
            window_size: (800.0, 600.0),
            resizable: true,
            vsync: true,
            gl_version: (3, 3),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            vertex_shader: PathBuf::from("demos/shaders/shape.vert"),
            fragment_shader: PathBuf::from("demos/shaders/shape.frag"),
            target_size: 2.0,
            primitive: Primitive::default(),
            polygon_mode: PolygonMode::default(),
        }
    }
}
