use serde::{Deserialize, Serialize};

/// Procedural mesh drawn at every placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    /// A single cube, one draw call.
    Cube,
    /// Stacked cubes, one draw call per level.
    #[default]
    Tower,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// World transform of one object instance.
pub struct PlacementOptions {
    /// World position.
    pub position: [f32; 3],
    /// Rotation about X, Y, Z in degrees.
    pub rotation: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }
}

impl PlacementOptions {
    fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// The mesh and where its instances are placed.
pub struct SceneOptions {
    /// Which mesh to generate.
    pub mesh: MeshKind,
    /// Edge length of a cube / tower level.
    pub size: f32,
    /// Levels of the tower mesh.
    pub tower_levels: u32,
    /// Color of the cube mesh.
    pub cube_color: [f32; 4],
    /// Object instances; placement `i` is picked as object `i + 1`.
    pub placements: Vec<PlacementOptions>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            mesh: MeshKind::Tower,
            size: 2.0,
            tower_levels: 3,
            cube_color: [0.7, 0.7, 0.75, 1.0],
            placements: vec![
                PlacementOptions::at([-10.0, 0.0, 5.0]),
                PlacementOptions::at([10.0, 0.0, 5.0]),
                PlacementOptions::at([0.0, 2.0, 20.0]),
            ],
        }
    }
}
