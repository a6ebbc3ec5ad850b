//! The smallest useful program: one orange-ish triangle in the middle of the window.
//!
//! Run from the crate root so the default shader paths resolve.

use mini_gl_shapes::{config, init_logging, LoggingConfig, Point2, Shape};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let triangle = Shape::new(vec![
        Point2::new(-0.5, -0.5),
        Point2::new(0.5, -0.5),
        Point2::new(0.0, 0.5),
    ]);

    // already in device coordinates, so keep the unit extent
    let config = config! {
        window_title: "LearnOpenGL".to_string(),
        target_size: 1.0,
    };

    mini_gl_shapes::run(config, &[triangle])?;
    Ok(())
}
