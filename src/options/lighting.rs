use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Directional light used by the lit pass.
pub struct LightingOptions {
    /// Light color.
    pub color: [f32; 3],
    /// Direction the light travels, world space.
    pub direction: [f32; 3],
    /// Ambient term scale.
    pub ambient_intensity: f32,
    /// Diffuse term scale.
    pub diffuse_intensity: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            direction: [-1.0, 0.0, 0.0],
            ambient_intensity: 0.3,
            diffuse_intensity: 0.7,
        }
    }
}
