use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Picking pass and selection highlight.
pub struct PickingOptions {
    /// Run the picking pass while the left button is held.
    pub enabled: bool,
    /// Color of the picked triangle overlay.
    pub highlight_color: [f32; 4],
    /// Multiplier applied to the selected object's material colors.
    pub selected_tint: [f32; 4],
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            highlight_color: [1.0, 0.0, 0.0, 1.0],
            selected_tint: [1.0, 0.85, 0.55, 1.0],
        }
    }
}
