use serde::{Deserialize, Serialize};

/// Actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// move_forward = "KeyW"
/// speed_up = "Equal"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Move along the view direction.
    MoveForward,
    /// Move against the view direction.
    MoveBackward,
    /// Move left, perpendicular to the view.
    StrafeLeft,
    /// Move right, perpendicular to the view.
    StrafeRight,
    /// Move along world up.
    MoveUp,
    /// Move along world down.
    MoveDown,
    /// Yaw left.
    TurnLeft,
    /// Yaw right.
    TurnRight,
    /// Pitch up.
    LookUp,
    /// Pitch down.
    LookDown,
    /// Raise the movement speed by one step.
    SpeedUp,
    /// Lower the movement speed by one step.
    SpeedDown,
    /// Log the camera position and orientation.
    LogPosition,
    /// Drop the current selection.
    ClearSelection,
    /// Close the viewer.
    Quit,
}
