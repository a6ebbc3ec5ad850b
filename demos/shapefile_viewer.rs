//! Draws every ring and line of a shapefile, fitted to the window.
//!
//! ```text
//! cargo run --example shapefile_viewer -- path/to/countries.shp
//! ```
//!
//! Escape quits, `W` toggles the wireframe coloring.

use anyhow::Context;
use log::info;

use mini_gl_shapes::{
    config, init_logging, load_shapefile, LoggingConfig, PolygonMode, Primitive,
};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let path = std::env::args()
        .nth(1)
        .context("usage: shapefile_viewer <file.shp>")?;
    let shapes = load_shapefile(&path).with_context(|| format!("loading {}", path))?;
    info!("{} shapes to draw", shapes.len());

    // rings are usually concave, so outlines are the honest default
    let config = config! {
        window_title: format!("shapefile: {}", path),
        window_size: (1024.0, 768.0),
        clear_color: [0.05, 0.05, 0.1, 1.0],
        primitive: Primitive::LineLoop,
        polygon_mode: PolygonMode::Line,
    };

    mini_gl_shapes::run(config, &shapes)?;
    Ok(())
}
