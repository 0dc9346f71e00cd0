//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! the picking state machine, right-button look) and the key-binding map.
//! It is the only thing that sits between raw window events and
//! [`PickEngine::execute`](crate::PickEngine::execute).

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::keyboard::KeyAction;
use super::pick_state::PickState;
use crate::engine::command::EngineCommand;
use crate::options::KeybindingOptions;

/// Converts raw window events into [`EngineCommand`]s.
///
/// # Usage
///
/// ```ignore
/// for cmd in input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
/// if let Some(pos) = input_processor.pick_frame() {
///     // run the picking pass at `pos`
/// }
/// ```
pub struct InputProcessor {
    /// Last cursor position in physical pixels.
    cursor: Vec2,
    /// Left-button picking state.
    pick: PickState,
    /// Whether the right button (mouse look) is held.
    looking: bool,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a processor with the given key bindings.
    #[must_use]
    pub fn new(key_bindings: KeybindingOptions) -> Self {
        Self {
            cursor: Vec2::ZERO,
            pick: PickState::Idle,
            looking: false,
            key_bindings,
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> (f32, f32) {
        (self.cursor.x, self.cursor.y)
    }

    /// Current picking state.
    #[must_use]
    pub fn pick_state(&self) -> PickState {
        self.pick
    }

    /// Advance the picking state by one frame and return where to pick.
    pub fn pick_frame(&mut self) -> Option<(f32, f32)> {
        self.pick.frame()
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, mut key_bindings: KeybindingOptions) {
        key_bindings.rebuild_reverse_map();
        self.key_bindings = key_bindings;
    }

    /// Process a raw input event and return the resulting commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<EngineCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Key { key, pressed } => {
                self.handle_key(&key, pressed).into_iter().collect()
            }
            InputEvent::Resized { width, height } => {
                vec![EngineCommand::Resize { width, height }]
            }
        }
    }

    /// Cursor moved: track it for picking, edge scrolling, and mouse look.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Vec<EngineCommand> {
        let position = Vec2::new(x, y);
        let delta = position - self.cursor;
        self.cursor = position;
        self.pick.moved(x, y);

        let mut commands = vec![EngineCommand::CursorAt { x, y }];
        if self.looking && delta != Vec2::ZERO {
            commands.push(EngineCommand::Look { delta });
        }
        commands
    }

    /// Left button drives picking, right button drives mouse look.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Vec<EngineCommand> {
        match (button, pressed) {
            (MouseButton::Left, true) => {
                self.pick.press(self.cursor.x, self.cursor.y);
                Vec::new()
            }
            (MouseButton::Left, false) => self
                .pick
                .release()
                .map(|(x, y)| EngineCommand::PickOnce { x, y })
                .into_iter()
                .collect(),
            (MouseButton::Right, pressed) => {
                self.looking = pressed;
                Vec::new()
            }
            (MouseButton::Middle, _) => Vec::new(),
        }
    }

    /// Look up a key press; releases and unbound keys produce nothing.
    fn handle_key(&self, key: &str, pressed: bool) -> Option<EngineCommand> {
        if !pressed {
            return None;
        }
        let action = self.key_bindings.lookup(key)?;
        Some(match action {
            KeyAction::ClearSelection => EngineCommand::ClearSelection,
            KeyAction::Quit => EngineCommand::Quit,
            camera => EngineCommand::Camera(camera),
        })
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(KeybindingOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    fn button(button: MouseButton, pressed: bool) -> InputEvent {
        InputEvent::MouseButton { button, pressed }
    }

    fn key(name: &str) -> InputEvent {
        InputEvent::Key {
            key: name.to_owned(),
            pressed: true,
        }
    }

    #[test]
    fn left_drag_repicks_at_latest_cursor() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(cursor(10.0, 10.0));
        let _ = input.handle_event(button(MouseButton::Left, true));
        assert_eq!(input.pick_frame(), Some((10.0, 10.0)));

        let _ = input.handle_event(cursor(30.0, 40.0));
        assert_eq!(input.pick_frame(), Some((30.0, 40.0)));

        let released = input.handle_event(button(MouseButton::Left, false));
        assert!(released.is_empty());
        assert_eq!(input.pick_frame(), None);
    }

    #[test]
    fn click_between_frames_emits_pending_pick() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(cursor(5.0, 6.0));
        let _ = input.handle_event(button(MouseButton::Left, true));
        let commands = input.handle_event(button(MouseButton::Left, false));
        assert_eq!(commands, vec![EngineCommand::PickOnce { x: 5.0, y: 6.0 }]);
    }

    #[test]
    fn right_drag_emits_look_deltas() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(cursor(100.0, 100.0));
        let idle = input.handle_event(cursor(110.0, 100.0));
        assert_eq!(idle, vec![EngineCommand::CursorAt { x: 110.0, y: 100.0 }]);

        let _ = input.handle_event(button(MouseButton::Right, true));
        let looking = input.handle_event(cursor(115.0, 90.0));
        assert!(looking.contains(&EngineCommand::Look {
            delta: Vec2::new(5.0, -10.0)
        }));

        let _ = input.handle_event(button(MouseButton::Right, false));
        let after = input.handle_event(cursor(120.0, 90.0));
        assert!(!after
            .iter()
            .any(|c| matches!(c, EngineCommand::Look { .. })));
    }

    #[test]
    fn bound_keys_map_to_commands() {
        let mut input = InputProcessor::default();
        assert_eq!(
            input.handle_event(key("KeyW")),
            vec![EngineCommand::Camera(KeyAction::MoveForward)]
        );
        assert_eq!(input.handle_event(key("Escape")), vec![EngineCommand::Quit]);
        assert_eq!(
            input.handle_event(key("Backspace")),
            vec![EngineCommand::ClearSelection]
        );
        assert!(input.handle_event(key("KeyZ")).is_empty());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut input = InputProcessor::default();
        let commands = input.handle_event(InputEvent::Key {
            key: "KeyW".to_owned(),
            pressed: false,
        });
        assert!(commands.is_empty());
    }

    #[test]
    fn resize_passes_through() {
        let mut input = InputProcessor::default();
        assert_eq!(
            input.handle_event(InputEvent::Resized {
                width: 640,
                height: 480
            }),
            vec![EngineCommand::Resize {
                width: 640,
                height: 480
            }]
        );
    }
}
