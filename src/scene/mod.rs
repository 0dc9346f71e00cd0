//! Object placements and the mesh drawn at each.
//!
//! Placement order is the pick order: placement `i` is written to the ID
//! framebuffer as object `i + 1`, with 0 reserved for the background. The
//! list is only exposed as a slice, so it cannot be reordered between the
//! picking pass and the lit pass of a frame.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::mesh::Mesh;
use crate::options::{MeshKind, PlacementOptions, SceneOptions};

/// Uniform scale, XYZ rotation in degrees, and translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    /// Uniform scale.
    pub scale: f32,
    /// Rotation about X, Y, Z in degrees.
    pub rotation: Vec3,
    /// World position.
    pub position: Vec3,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: Vec3::ZERO,
            position: Vec3::ZERO,
        }
    }
}

impl From<&PlacementOptions> for WorldTransform {
    fn from(opts: &PlacementOptions) -> Self {
        Self {
            scale: opts.scale,
            rotation: Vec3::from(opts.rotation),
            position: Vec3::from(opts.position),
        }
    }
}

impl WorldTransform {
    /// `T * R * S`, with `R = Rz * Ry * Rx`.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
        );
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            rotation,
            self.position,
        )
    }
}

/// One mesh instanced at an ordered list of placements.
pub struct Scene {
    mesh: Mesh,
    placements: Vec<WorldTransform>,
}

impl Scene {
    /// Scene of `mesh` at the given placements.
    #[must_use]
    pub fn new(mesh: Mesh, placements: Vec<WorldTransform>) -> Self {
        Self { mesh, placements }
    }

    /// Generate the configured mesh and placements.
    #[must_use]
    pub fn from_options(opts: &SceneOptions) -> Self {
        let mesh = match opts.mesh {
            MeshKind::Cube => Mesh::cube(opts.size, opts.cube_color),
            MeshKind::Tower => Mesh::tower(opts.tower_levels, opts.size),
        };
        let placements =
            opts.placements.iter().map(WorldTransform::from).collect();
        Self::new(mesh, placements)
    }

    /// The mesh drawn at every placement.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Placements in pick order.
    #[must_use]
    pub fn placements(&self) -> &[WorldTransform] {
        &self.placements
    }

    /// Number of placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Object id written to the ID framebuffer for placement `index`.
    #[must_use]
    pub fn pick_index(index: usize) -> u32 {
        index as u32 + 1
    }
}
