use wgpu::util::DeviceExt;

use super::{Mesh, SubMesh};
use crate::error::PickviewError;
use crate::technique::DrawCallbacks;

/// A [`Mesh`] uploaded to vertex and index buffers.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    submeshes: Vec<SubMesh>,
    colors: Vec<[f32; 4]>,
}

impl GpuMesh {
    /// Validate `mesh` and upload it.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] if the mesh fails
    /// [`Mesh::validate`].
    pub fn upload(
        device: &wgpu::Device,
        label: &str,
        mesh: &Mesh,
    ) -> Result<Self, PickviewError> {
        mesh.validate()?;

        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "uploaded mesh '{label}': {} submeshes, {} triangles",
            mesh.submeshes.len(),
            mesh.triangle_count()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            submeshes: mesh.submeshes.clone(),
            colors: mesh.submesh_colors(),
        })
    }

    /// Number of draw calls per [`render`](Self::render).
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Diffuse color of each submesh, in draw order.
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    fn set_buffers(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
    }

    /// Draw every submesh in order, calling `callbacks.draw_start` with the
    /// submesh index before each draw.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `draw_start`.
    pub fn render(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        callbacks: &mut impl DrawCallbacks,
    ) -> Result<(), PickviewError> {
        self.set_buffers(pass);
        for (draw_index, sub) in self.submeshes.iter().enumerate() {
            callbacks.draw_start(pass, draw_index as u32)?;
            pass.draw_indexed(
                sub.base_index..sub.base_index + sub.num_indices,
                sub.base_vertex as i32,
                0..1,
            );
        }
        Ok(())
    }

    /// Draw the single triangle `prim_index` of submesh `draw_index`.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] if either index does not
    /// exist.
    pub fn render_primitive(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        draw_index: u32,
        prim_index: u32,
    ) -> Result<(), PickviewError> {
        let (first, base_vertex) =
            primitive_range(&self.submeshes, draw_index, prim_index)?;
        self.set_buffers(pass);
        pass.draw_indexed(first..first + 3, base_vertex, 0..1);
        Ok(())
    }
}

/// First index and base vertex of one triangle.
fn primitive_range(
    submeshes: &[SubMesh],
    draw_index: u32,
    prim_index: u32,
) -> Result<(u32, i32), PickviewError> {
    let sub = submeshes.get(draw_index as usize).ok_or_else(|| {
        PickviewError::InvalidArgument(format!(
            "draw {draw_index} of {} submeshes",
            submeshes.len()
        ))
    })?;
    if prim_index >= sub.triangle_count() {
        return Err(PickviewError::InvalidArgument(format!(
            "primitive {prim_index} of {} in draw {draw_index}",
            sub.triangle_count()
        )));
    }
    Ok((sub.base_index + prim_index * 3, sub.base_vertex as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_range_offsets_into_submesh() {
        let mesh = Mesh::tower(2, 1.0);
        let (first, base_vertex) =
            primitive_range(&mesh.submeshes, 1, 4).unwrap();
        assert_eq!(first, 36 + 12);
        assert_eq!(base_vertex, 24);
    }

    #[test]
    fn primitive_range_rejects_unknown_draw() {
        let mesh = Mesh::cube(1.0, [1.0; 4]);
        assert!(matches!(
            primitive_range(&mesh.submeshes, 1, 0),
            Err(PickviewError::InvalidArgument(_))
        ));
    }

    #[test]
    fn primitive_range_rejects_unknown_triangle() {
        let mesh = Mesh::cube(1.0, [1.0; 4]);
        assert!(primitive_range(&mesh.submeshes, 0, 11).is_ok());
        assert!(primitive_range(&mesh.submeshes, 0, 12).is_err());
    }
}
