//! The seam between [`ShaderProgram`][crate::ShaderProgram] and the OpenGL driver.
//!
//! Everything here is a thin call into `gl`/`rustic_gl`. [`RawGl`] requires a current context on
//! the calling thread; it does not check for one.

use std::ffi::CStr;
use std::ptr::null_mut;

use gl::types::*;

use crate::shader::ShaderStage;

/// The handful of GL entry points needed to build and drive a shader program.
///
/// Compile and link report failure as the driver's info log.
pub trait GlBackend {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<GLuint, String>;
    fn delete_shader(&self, shader: GLuint);
    fn link_program(&self, shaders: &[GLuint]) -> Result<GLuint, String>;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);
    /// Returns `-1` for names that are not active uniforms of `program`.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_1i(&self, location: GLint, value: GLint);
    fn uniform_1f(&self, location: GLint, value: GLfloat);
}

/// Talks to whatever context is current on this thread, through the globally loaded `gl`
/// function pointers.
#[derive(Copy, Clone, Debug, Default)]
pub struct RawGl;

impl GlBackend for RawGl {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<GLuint, String> {
        match rustic_gl::raw::create_shader(stage.gl_enum(), source) {
            Ok(gl_id) => Ok(gl_id),
            Err(rustic_gl::error::GlError::ShaderCompilation(info)) => {
                Err(info.unwrap_or_default())
            }
            Err(err) => Err(err.to_string()),
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe {
            gl::DeleteShader(shader);
        }
    }

    fn link_program(&self, shaders: &[GLuint]) -> Result<GLuint, String> {
        let program = rustic_gl::raw::create_program().map_err(|err| err.to_string())?;
        unsafe {
            for &shader in shaders {
                gl::AttachShader(program, shader);
            }
            gl::LinkProgram(program);
            let status = rustic_gl::raw::get_link_status(program);
            for &shader in shaders {
                gl::DetachShader(program, shader);
            }
            if let Err(err) = status {
                let log = program_info_log(program);
                gl::DeleteProgram(program);
                return Err(if log.is_empty() { err.to_string() } else { log });
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe {
            gl::DeleteProgram(program);
        }
    }

    fn use_program(&self, program: GLuint) {
        unsafe {
            gl::UseProgram(program);
        }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        unsafe {
            gl::Uniform1i(location, value);
        }
    }

    fn uniform_1f(&self, location: GLint, value: GLfloat) {
        unsafe {
            gl::Uniform1f(location, value);
        }
    }
}

unsafe fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    gl::GetProgramInfoLog(program, len, null_mut(), buf.as_mut_ptr() as *mut GLchar);
    // drop the trailing NUL (and anything after it)
    if let Some(end) = buf.iter().position(|&b| b == 0) {
        buf.truncate(end);
    }
    String::from_utf8_lossy(&buf).trim_end().to_string()
}
