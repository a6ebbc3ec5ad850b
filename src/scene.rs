//! GPU-resident scene geometry.

use std::mem::size_of_val;

use gl::types::*;
use log::{debug, trace};

use crate::backend::GlBackend;
use crate::error::{Error, Result};
use crate::geometry::{DrawRange, Geometry};
use crate::shader::ShaderProgram;

type VertexFormat = buffer_layout!([f32; 3]);

/// How filled primitives are rasterized.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    /// Outlines only.
    Line,
}

impl PolygonMode {
    pub fn gl_enum(self) -> GLenum {
        match self {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PolygonMode::Fill => PolygonMode::Line,
            PolygonMode::Line => PolygonMode::Fill,
        }
    }
}

impl Default for PolygonMode {
    fn default() -> Self {
        PolygonMode::Fill
    }
}

/// The primitive each shape is drawn as.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Primitive {
    Triangles = gl::TRIANGLES,
    TriangleFan = gl::TRIANGLE_FAN,
    LineLoop = gl::LINE_LOOP,
    LineStrip = gl::LINE_STRIP,
    Points = gl::POINTS,
}

impl Default for Primitive {
    fn default() -> Self {
        Primitive::TriangleFan
    }
}

/// One vertex buffer holding every shape, plus the state needed to draw it.
///
/// Owns its VAO and VBO; both are deleted on drop, so drop it before the context goes away.
#[derive(Debug)]
pub struct Scene {
    vao: GLuint,
    vbo: GLuint,
    ranges: Vec<DrawRange>,
    polygon_mode: PolygonMode,
    primitive: Primitive,
}

impl Scene {
    /// Uploads `geometry` once. Vertex attribute 0 is a `vec3` position.
    pub fn upload(geometry: &Geometry, primitive: Primitive) -> Result<Scene> {
        let vao = rustic_gl::raw::create_vao()
            .map_err(|err| Error::Context(format!("creating vertex array: {}", err)))?;
        let vbo = match rustic_gl::raw::create_buffer() {
            Ok(vbo) => vbo,
            Err(err) => {
                unsafe {
                    gl::DeleteVertexArrays(1, &vao);
                }
                return Err(Error::Context(format!("creating vertex buffer: {}", err)));
            }
        };

        unsafe {
            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                size_of_val(geometry.vertices.as_slice()) as _,
                geometry.vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
            VertexFormat::declare(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        debug!(
            "uploaded {} vertices in {} shapes (vao {}, vbo {})",
            geometry.vertex_count(),
            geometry.counts.len(),
            vao,
            vbo
        );

        Ok(Scene {
            vao,
            vbo,
            ranges: geometry.draw_ranges(),
            polygon_mode: PolygonMode::default(),
            primitive,
        })
    }

    pub fn draw_ranges(&self) -> &[DrawRange] {
        &self.ranges
    }

    pub fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.polygon_mode = mode;
    }

    pub fn toggle_polygon_mode(&mut self) -> PolygonMode {
        self.polygon_mode = self.polygon_mode.toggled();
        debug!("polygon mode is now {:?}", self.polygon_mode);
        self.polygon_mode
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Issues one draw call per non-empty shape with `program` bound.
    pub fn draw<B: GlBackend>(&self, program: &ShaderProgram<B>) {
        program.use_program();
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, self.polygon_mode.gl_enum());
            gl::BindVertexArray(self.vao);
            for range in self.ranges.iter().filter(|r| r.count > 0) {
                gl::DrawArrays(self.primitive as GLenum, range.first as _, range.count as _);
            }
            gl::BindVertexArray(0);
        }
        trace!("drew {} shapes", self.ranges.len());
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
