//! Error type shared by shader loading, geometry normalization and window setup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Everything that can go wrong while building the pieces handed to the render loop.
#[derive(Debug, Error)]
pub enum Error {
    /// A shader source file could not be read.
    #[error("could not read shader source {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single stage failed to compile. `log` is the driver's info log, possibly empty.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    ShaderLink { log: String },

    /// The bounding box of the input has no extent on at least one axis, so it cannot be scaled.
    #[error("geometry bounds are degenerate (range x = {range_x}, range y = {range_y})")]
    DegenerateGeometry { range_x: f64, range_y: f64 },

    #[error("geometry contains no points")]
    EmptyGeometry,

    /// A point has a NaN or infinite coordinate.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    /// The normalizer's target extent must be finite and positive.
    #[error("invalid target size {0}")]
    InvalidTargetSize(f64),

    #[error("failed to read shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Window or OpenGL context creation failed.
    #[error("failed to set up OpenGL context: {0}")]
    Context(String),
}

pub type Result<T> = std::result::Result<T, Error>;
