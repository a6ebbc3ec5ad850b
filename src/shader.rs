//! Building a linked program out of a vertex and a fragment shader.

use std::ffi::CString;
use std::fmt;
use std::fs;
use std::path::Path;

use gl::types::*;
use log::{debug, error, trace, warn};

use crate::backend::{GlBackend, RawGl};
use crate::error::{Error, Result};

/// One compiled unit of the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Deletes a compiled stage when it goes out of scope, whether or not linking succeeded.
struct StageGuard<'a, B: GlBackend> {
    backend: &'a B,
    id: GLuint,
}

impl<'a, B: GlBackend> StageGuard<'a, B> {
    fn compile(backend: &'a B, stage: ShaderStage, source: &str) -> Result<Self> {
        match backend.compile_shader(stage, source) {
            Ok(id) => {
                trace!("compiled {} shader {}", stage, id);
                Ok(StageGuard { backend, id })
            }
            Err(log) => {
                error!("{} shader compilation failed: {}", stage, log);
                Err(Error::ShaderCompile { stage, log })
            }
        }
    }
}

impl<B: GlBackend> Drop for StageGuard<'_, B> {
    fn drop(&mut self) {
        self.backend.delete_shader(self.id);
    }
}

/// A linked GL program. The program object is deleted when this is dropped, so it must be
/// dropped while its context is still alive.
///
/// Uniform setters look the location up by name every call. Writing to a name the program does
/// not have is harmless: GL ignores writes to location `-1`.
pub struct ShaderProgram<B: GlBackend = RawGl> {
    backend: B,
    id: GLuint,
}

impl ShaderProgram<RawGl> {
    /// Reads both files and builds the program against the current context.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        vertex_path: P,
        fragment_path: Q,
    ) -> Result<Self> {
        Self::from_files_with(RawGl, vertex_path, fragment_path)
    }

    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> Result<Self> {
        Self::from_sources_with(RawGl, vertex_source, fragment_source)
    }
}

impl<B: GlBackend> ShaderProgram<B> {
    pub fn from_files_with<P: AsRef<Path>, Q: AsRef<Path>>(
        backend: B,
        vertex_path: P,
        fragment_path: Q,
    ) -> Result<Self> {
        let vertex_source = read_source(vertex_path.as_ref())?;
        let fragment_source = read_source(fragment_path.as_ref())?;
        Self::from_sources_with(backend, &vertex_source, &fragment_source)
    }

    pub fn from_sources_with(
        backend: B,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self> {
        let id = {
            let vertex = StageGuard::compile(&backend, ShaderStage::Vertex, vertex_source)?;
            let fragment = StageGuard::compile(&backend, ShaderStage::Fragment, fragment_source)?;
            backend
                .link_program(&[vertex.id, fragment.id])
                .map_err(|log| {
                    error!("shader program link failed: {}", log);
                    Error::ShaderLink { log }
                })?
        };
        debug!("linked shader program {}", id);
        Ok(ShaderProgram { backend, id })
    }

    /// The backend's program handle.
    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Makes this the active program of the current context.
    pub fn use_program(&self) {
        self.backend.use_program(self.id);
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        let location = self.location(name);
        self.backend.uniform_1i(location, value as GLint);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        let location = self.location(name);
        self.backend.uniform_1i(location, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        let location = self.location(name);
        self.backend.uniform_1f(location, value);
    }

    fn location(&self, name: &str) -> GLint {
        let c_name = match CString::new(name) {
            Ok(c_name) => c_name,
            Err(_) => {
                warn!("uniform name {:?} contains a NUL byte", name);
                return -1;
            }
        };
        let location = self.backend.uniform_location(self.id, &c_name);
        if location < 0 {
            trace!("uniform {:?} not found in program {}", name, self.id);
        }
        location
    }
}

impl<B: GlBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.id);
    }
}

impl<B: GlBackend> fmt::Debug for ShaderProgram<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram").field("id", &self.id).finish()
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        error!("failed to read shader source {}: {}", path.display(), source);
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
