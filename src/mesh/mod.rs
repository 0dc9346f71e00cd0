//! Indexed triangle meshes split into submeshes.
//!
//! A submesh is one draw call; its position in [`Mesh::submeshes`] is the
//! `draw_id` written by the picking pass. Meshes are generated
//! procedurally ([`Mesh::cube`], [`Mesh::tower`]) rather than loaded from
//! files.

mod gpu;

use glam::Vec3;

pub use gpu::GpuMesh;

use crate::error::PickviewError;

/// Interleaved vertex: position, texture coordinate, normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
        2 => Float32x3,
    ];

    /// Buffer layout matching `VertexInput` in the shared transform module.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One draw call's slice of the shared index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMesh {
    /// First index in [`Mesh::indices`].
    pub base_index: u32,
    /// Number of indices (a multiple of 3).
    pub num_indices: u32,
    /// Added to every index of this submesh.
    pub base_vertex: u32,
    /// Index into [`Mesh::materials`].
    pub material_index: usize,
}

impl SubMesh {
    /// Triangles drawn by this submesh.
    #[must_use]
    pub fn triangle_count(&self) -> u32 {
        self.num_indices / 3
    }
}

/// Surface parameters of a submesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA diffuse color.
    pub diffuse_color: [f32; 4],
}

/// CPU-side mesh data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data shared by all submeshes.
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices, relative to each submesh's `base_vertex`.
    pub indices: Vec<u32>,
    /// Draw calls in order.
    pub submeshes: Vec<SubMesh>,
    /// Materials referenced by submeshes.
    pub materials: Vec<Material>,
}

/// Level colors for [`Mesh::tower`], cycled when there are more levels.
const TOWER_PALETTE: [[f32; 4]; 4] = [
    [0.80, 0.35, 0.30, 1.0],
    [0.35, 0.70, 0.40, 1.0],
    [0.30, 0.45, 0.85, 1.0],
    [0.85, 0.75, 0.30, 1.0],
];

/// (normal, u, v) per face with `u x v == normal`, so the corner order
/// below is counter-clockwise seen from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

impl Mesh {
    /// Axis-aligned cube of edge `size` centered on the origin, drawn as a
    /// single submesh of 12 triangles.
    #[must_use]
    pub fn cube(size: f32, color: [f32; 4]) -> Self {
        let mut mesh = Self::default();
        mesh.push_box(Vec3::ZERO, size * 0.5, color);
        mesh
    }

    /// `levels` cubes of edge `size` stacked upward from the origin. Each
    /// level is its own submesh with its own material, so picking reports
    /// the level as `draw_id`.
    #[must_use]
    pub fn tower(levels: u32, size: f32) -> Self {
        let mut mesh = Self::default();
        for level in 0..levels.max(1) {
            let center = Vec3::new(0.0, size * (level as f32 + 0.5), 0.0);
            let color = TOWER_PALETTE[level as usize % TOWER_PALETTE.len()];
            mesh.push_box(center, size * 0.5, color);
        }
        mesh
    }

    /// Append a box as a new submesh with its own material.
    fn push_box(&mut self, center: Vec3, half: f32, color: [f32; 4]) {
        let base_vertex = self.vertices.len() as u32;
        let base_index = self.indices.len() as u32;

        for (face, (normal, u, v)) in FACES.iter().enumerate() {
            let face_center = center + *normal * half;
            let corners = [
                (face_center - *u * half - *v * half, [0.0, 1.0]),
                (face_center + *u * half - *v * half, [1.0, 1.0]),
                (face_center + *u * half + *v * half, [1.0, 0.0]),
                (face_center - *u * half + *v * half, [0.0, 0.0]),
            ];
            for (position, uv) in corners {
                self.vertices.push(Vertex {
                    position: position.to_array(),
                    uv,
                    normal: normal.to_array(),
                });
            }
            let first = face as u32 * 4;
            self.indices.extend_from_slice(&[
                first,
                first + 1,
                first + 2,
                first,
                first + 2,
                first + 3,
            ]);
        }

        self.submeshes.push(SubMesh {
            base_index,
            num_indices: self.indices.len() as u32 - base_index,
            base_vertex,
            material_index: self.materials.len(),
        });
        self.materials.push(Material {
            diffuse_color: color,
        });
    }

    /// Total triangles across all submeshes.
    #[must_use]
    pub fn triangle_count(&self) -> u32 {
        self.submeshes.iter().map(SubMesh::triangle_count).sum()
    }

    /// Diffuse color of each submesh, in draw order.
    #[must_use]
    pub fn submesh_colors(&self) -> Vec<[f32; 4]> {
        self.submeshes
            .iter()
            .map(|s| {
                self.materials
                    .get(s.material_index)
                    .map_or([1.0; 4], |m| m.diffuse_color)
            })
            .collect()
    }

    /// Check that every submesh stays inside the index buffer, draws whole
    /// triangles, references an existing material, and only addresses
    /// existing vertices.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] naming the first bad
    /// submesh.
    pub fn validate(&self) -> Result<(), PickviewError> {
        let invalid = |draw: usize, what: String| {
            PickviewError::InvalidArgument(format!("submesh {draw}: {what}"))
        };

        for (draw, sub) in self.submeshes.iter().enumerate() {
            if sub.num_indices % 3 != 0 {
                return Err(invalid(
                    draw,
                    format!("{} indices is not whole triangles", sub.num_indices),
                ));
            }
            let start = sub.base_index as usize;
            let end = start.saturating_add(sub.num_indices as usize);
            let Some(range) = self.indices.get(start..end) else {
                return Err(invalid(
                    draw,
                    format!(
                        "indices {start}..{end} exceed {}",
                        self.indices.len()
                    ),
                ));
            };
            if sub.material_index >= self.materials.len() {
                return Err(invalid(
                    draw,
                    format!("material {} missing", sub.material_index),
                ));
            }
            let vertex_count = self.vertices.len() as u64;
            if let Some(vertex) = range
                .iter()
                .map(|&i| u64::from(i) + u64::from(sub.base_vertex))
                .find(|&v| v >= vertex_count)
            {
                return Err(invalid(
                    draw,
                    format!("vertex {vertex} out of {vertex_count}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(mesh: &Mesh, sub: &SubMesh, tri: u32) -> [Vec3; 3] {
        let start = (sub.base_index + tri * 3) as usize;
        let corner = |k: usize| {
            let i = mesh.indices[start + k] + sub.base_vertex;
            Vec3::from(mesh.vertices[i as usize].position)
        };
        [corner(0), corner(1), corner(2)]
    }

    #[test]
    fn cube_is_one_submesh_of_twelve_triangles() {
        let mesh = Mesh::cube(2.0, [1.0; 4]);
        assert_eq!(mesh.submeshes.len(), 1);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices.len(), 24);
        mesh.validate().unwrap();
    }

    #[test]
    fn cube_winding_is_counter_clockwise_from_outside() {
        let mesh = Mesh::cube(2.0, [1.0; 4]);
        let sub = mesh.submeshes[0];
        for tri in 0..sub.triangle_count() {
            let [a, b, c] = triangle(&mesh, &sub, tri);
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                face_normal.dot(centroid) > 0.0,
                "triangle {tri} faces inward"
            );
        }
    }

    #[test]
    fn cube_extent_matches_size() {
        let mesh = Mesh::cube(3.0, [1.0; 4]);
        for v in &mesh.vertices {
            for c in v.position {
                assert!(c.abs() <= 1.5 + 1e-6);
            }
        }
        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn tower_has_one_submesh_and_material_per_level() {
        let mesh = Mesh::tower(3, 1.0);
        assert_eq!(mesh.submeshes.len(), 3);
        assert_eq!(mesh.materials.len(), 3);
        for (level, sub) in mesh.submeshes.iter().enumerate() {
            assert_eq!(sub.material_index, level);
            assert_eq!(sub.triangle_count(), 12);
        }
        assert_ne!(mesh.submesh_colors()[0], mesh.submesh_colors()[1]);
        mesh.validate().unwrap();
    }

    #[test]
    fn tower_levels_stack_upward() {
        let mesh = Mesh::tower(2, 1.0);
        let top = mesh.submeshes[1];
        let [a, b, c] = triangle(&mesh, &top, 0);
        assert!(a.y >= 1.0 && b.y >= 1.0 && c.y >= 1.0);
    }

    #[test]
    fn validate_rejects_out_of_range_indices() {
        let mut mesh = Mesh::cube(1.0, [1.0; 4]);
        mesh.submeshes[0].num_indices += 3;
        assert!(matches!(
            mesh.validate(),
            Err(PickviewError::InvalidArgument(_))
        ));
    }

    #[test]
    fn validate_rejects_dangling_vertex() {
        let mut mesh = Mesh::cube(1.0, [1.0; 4]);
        mesh.indices[0] = 1000;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn validate_rejects_vertex_past_u32_range() {
        let mut mesh = Mesh::cube(1.0, [1.0; 4]);
        mesh.submeshes[0].base_vertex = u32::MAX - 1;
        mesh.indices[0] = 5;
        let Err(PickviewError::InvalidArgument(message)) = mesh.validate()
        else {
            panic!("expected InvalidArgument");
        };
        assert!(message.contains(&(u64::from(u32::MAX) + 4).to_string()));
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let mut mesh = Mesh::cube(1.0, [1.0; 4]);
        mesh.submeshes[0].num_indices -= 1;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn vertex_layout_stride_matches_struct() {
        assert_eq!(Vertex::layout().array_stride, 32);
        assert_eq!(Vertex::layout().attributes.len(), 3);
    }
}
