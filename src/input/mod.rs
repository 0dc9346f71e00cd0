//! Input handling: event types, the picking state machine, and the input
//! processor that converts raw window events into engine commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
mod keyboard;
/// Mouse-down / picking / release state machine.
pub mod pick_state;
/// Converts raw events into engine commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use pick_state::PickState;
pub use processor::InputProcessor;
