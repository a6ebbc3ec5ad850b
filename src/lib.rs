//! Loads shader programs and draws 2D shapes fitted to the window, on top of OpenGL.
//!
//! The pieces:
//!
//! - [`ShaderProgram`] reads a vertex and a fragment shader, compiles and links them and offers
//!   named uniform setters.
//! - [`Normalizer`] fits arbitrary point sets into device coordinates, keeping the aspect ratio.
//! - [`Scene`] uploads the normalized vertices once and draws each shape as its own slice.
//! - [`ShapeViewer`] opens a glutin window and runs the render loop. Escape quits, `W` toggles
//!   wireframe.
//!
//! Shapes can be given literally or read from an ESRI shapefile with [`load_shapefile`].
//!
//! ```no_run
//! use mini_gl_shapes::{config, Point2, Shape};
//!
//! let triangle = Shape::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(10.0, 0.0),
//!     Point2::new(0.0, 10.0),
//! ]);
//! mini_gl_shapes::run(config! { window_title: "Triangle".to_string() }, &[triangle]).unwrap();
//! ```

#[macro_use]
extern crate rustic_gl;

pub extern crate glutin;

pub mod backend;
pub mod breakout;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod scene;
pub mod shader;
pub mod shp;
pub mod viewer;

pub use crate::backend::{GlBackend, RawGl};
pub use crate::breakout::{BasicInput, GlutinBreakout};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::geometry::{Bounds, DrawRange, Geometry, Normalizer, Point2, Shape};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::scene::{PolygonMode, Primitive, Scene};
pub use crate::shader::{ShaderProgram, ShaderStage};
pub use crate::shp::{load_shapefile, shapes_from_records};
pub use crate::viewer::{init_glutin_context, ShapeViewer};

use glutin::event_loop::EventLoop;

/// Creates a [`Config`] from the given fields, filling the rest with defaults.
///
/// ```
/// use mini_gl_shapes::config;
///
/// let config = config! {
///     window_size: (640.0, 480.0),
///     resizable: false,
/// };
/// assert_eq!(config.gl_version, (3, 3));
/// ```
#[macro_export]
macro_rules! config {
    {$($k:ident: $v:expr),+$(,)?} => {
        $crate::Config {
            $($k: $v),+,
            ..Default::default()
        }
    };
    {} => {
        $crate::Config::default()
    };
}

/// Normalizes `shapes` and builds a [`ShapeViewer`] on `event_loop`.
pub fn get_fancy<ET: 'static>(
    config: &Config,
    event_loop: &EventLoop<ET>,
    shapes: &[Shape],
) -> Result<ShapeViewer> {
    let geometry = Normalizer::new(config.target_size).normalize(shapes)?;
    ShapeViewer::new(config, event_loop, &geometry)
}

/// Opens a window showing `shapes` and runs until it is closed.
///
/// Only returns if setup fails.
pub fn run(config: Config, shapes: &[Shape]) -> Result<()> {
    let event_loop = EventLoop::new();
    let viewer = get_fancy(&config, &event_loop, shapes)?;
    viewer.run(event_loop)
}
