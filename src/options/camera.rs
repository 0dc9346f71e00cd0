use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and first-person control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Initial eye position.
    pub position: [f32; 3],
    /// Initial look direction (need not be normalized).
    pub target: [f32; 3],
    /// World units moved per movement key press.
    pub speed: f32,
    /// Amount the speed keys add or remove.
    pub speed_step: f32,
    /// Degrees turned per arrow key press.
    pub turn_step: f32,
    /// Degrees of yaw/pitch per pixel of right-drag.
    pub mouse_sensitivity: f32,
    /// Turn when the cursor rests near a window edge.
    pub edge_scroll: bool,
    /// Width in pixels of the edge-scroll band.
    pub margin: f32,
    /// Degrees turned per frame while edge scrolling.
    pub edge_step: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 1.0,
            zfar: 100.0,
            position: [0.0, 5.0, -22.0],
            target: [0.0, -0.2, 1.0],
            speed: 1.0,
            speed_step: 0.1,
            turn_step: 2.0,
            mouse_sensitivity: 0.05,
            edge_scroll: false,
            margin: 40.0,
            edge_step: 0.5,
        }
    }
}
