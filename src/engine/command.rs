//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press or a mouse
//! gesture, is represented as an `EngineCommand`. The
//! [`InputProcessor`](crate::input::InputProcessor) produces them and
//! [`PickEngine::execute`](super::PickEngine::execute) applies them.

use glam::Vec2;

use crate::input::KeyAction;

/// A discrete engine operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    /// Camera movement, turning, speed, or position logging.
    Camera(KeyAction),
    /// Mouse look by a cursor delta in physical pixels.
    Look {
        /// Cursor movement since the previous event.
        delta: Vec2,
    },
    /// Cursor position, for edge scrolling.
    CursorAt {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// A click released before any frame picked it; pick once next frame.
    PickOnce {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Drop the current selection.
    ClearSelection,
    /// The window's inner size changed.
    Resize {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// Leave the event loop.
    Quit,
}
