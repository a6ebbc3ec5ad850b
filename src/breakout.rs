//! Contains the [`GlutinBreakout`] struct, which is a way to "break out" the Glutin context,
//! shader program and scene and manipulate them directly, plus the [`BasicInput`] key tracking
//! used by the built-in render loop.

use std::collections::HashMap;

use glutin::event::{ModifiersState, VirtualKeyCode};
use glutin::{ContextError, PossiblyCurrent, WindowedContext};

use crate::scene::Scene;
use crate::shader::ShaderProgram;

/// Useful when [`ShapeViewer::run`][crate::ShapeViewer::run] is too rigid, e.g. when you want to
/// route events for several windows yourself. Obtain it with
/// [`ShapeViewer::glutin_breakout`][crate::ShapeViewer::glutin_breakout].
///
/// Fields drop in declaration order: the scene and program are released while the context is
/// still alive.
pub struct GlutinBreakout {
    pub scene: Scene,
    pub program: ShaderProgram,
    /// The OpenGL context and its window.
    pub context: WindowedContext<PossiblyCurrent>,
}

impl GlutinBreakout {
    /// Makes this breakout's context current on this thread, in place.
    ///
    /// glutin's own `make_current` consumes the context and hands back a new one, which cannot
    /// be done through `&mut self` without this dance.
    ///
    /// # Safety
    ///
    /// Same contract as glutin's `make_current`.
    pub unsafe fn make_current(&mut self) -> Result<(), ContextError> {
        let context_ptr: *mut _ = &mut self.context;
        let context = std::ptr::read(context_ptr);

        match context.make_current() {
            Ok(context) => {
                std::ptr::write(context_ptr, context);
                Ok(())
            }
            Err((context, err)) => {
                std::ptr::write(context_ptr, context);
                Err(err)
            }
        }
    }

    /// Draws the scene and presents it.
    pub fn draw(&self) -> Result<(), ContextError> {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
        self.scene.draw(&self.program);
        self.context.swap_buffers()
    }
}

/// Keyboard state in a polling-like fashion.
#[non_exhaustive]
#[derive(Default, Clone, PartialEq, Debug)]
pub struct BasicInput {
    /// Stores the previous and current "key down" states, in that order.
    ///
    /// If a key has not been pressed yet it will not be in the map.
    pub keys: HashMap<VirtualKeyCode, (bool, bool)>,
    /// The current modifier keys that are being pressed.
    pub modifiers: ModifiersState,
    /// Set when the window was resized since the last [`end_frame`][BasicInput::end_frame].
    pub resized: bool,
}

impl BasicInput {
    /// Records a key event. The previous state of that key becomes its current one first.
    pub fn set_key(&mut self, key: VirtualKeyCode, down: bool) {
        let state = self.keys.entry(key).or_insert((false, false));
        state.0 = state.1;
        state.1 = down;
    }

    /// Copies current states into previous states so edges are only reported once.
    pub fn end_frame(&mut self) {
        for (_, val) in &mut self.keys {
            val.0 = val.1;
        }
        self.resized = false;
    }

    /// If the key was pressed this last frame.
    pub fn key_pressed(&self, key: VirtualKeyCode) -> bool {
        &(false, true) == self.keys.get(&key).unwrap_or(&(false, false))
    }

    /// If the key is currently down.
    pub fn key_is_down(&self, key: VirtualKeyCode) -> bool {
        matches!(self.keys.get(&key), Some(&(_, true)))
    }

    /// If the key was released this last frame.
    pub fn key_released(&self, key: VirtualKeyCode) -> bool {
        &(true, false) == self.keys.get(&key).unwrap_or(&(false, false))
    }
}
