use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Window creation and frame pacing.
pub struct WindowOptions {
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Frame cap (0 = unlimited).
    pub target_fps: u32,
    /// Background color of the lit pass.
    pub clear_color: [f32; 4],
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            title: "pickview".to_owned(),
            target_fps: 60,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
