use glam::Mat4;

use super::{ShaderProgram, Technique, UniformLocation};
use crate::error::PickviewError;
use crate::gpu::pipeline_helpers::{create_mesh_pipeline, MeshPipelineDesc};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::uniform_ring::UniformRing;
use crate::mesh::GpuMesh;

/// Per-draw uniform of the solid-color overlay (`u_draw` in
/// `simple_color.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimpleColorDraw {
    /// Projection * View * World.
    pub wvp: [[f32; 4]; 4],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

/// Flat color with `LessEqual` depth and a negative bias, so a triangle
/// redrawn over the lit surface wins the depth test.
pub struct SimpleColorTechnique {
    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    draws: UniformRing<SimpleColorDraw>,
    draw_location: UniformLocation,
}

impl SimpleColorTechnique {
    /// Build the overlay pipeline rendering into `format`.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] or
    /// [`PickviewError::MissingUniform`].
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
    ) -> Result<Self, PickviewError> {
        let program = ShaderProgram::new(
            device,
            composer,
            "SimpleColor",
            (
                include_str!("../../assets/shaders/simple_color.wgsl"),
                "simple_color.wgsl",
            ),
            &[],
        )?;
        let draw_location = program.require("u_draw")?;

        let draws = UniformRing::new(
            device,
            "Simple Color Draws",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let pipeline = create_mesh_pipeline(
            device,
            program.module(),
            &[draws.layout()],
            &MeshPipelineDesc {
                label: "Simple Color",
                format,
                depth_compare: wgpu::CompareFunction::LessEqual,
                depth_bias: wgpu::DepthBiasState {
                    constant: -2,
                    slope_scale: -1.0,
                    clamp: 0.0,
                },
                ..Default::default()
            },
        );

        Ok(Self {
            program,
            pipeline,
            draws,
            draw_location,
        })
    }

    /// Reserve uniform slots for `draws` overlays this frame.
    pub fn begin_frame(&mut self, device: &wgpu::Device, draws: usize) {
        let _ = self.draws.begin_frame(device, draws);
    }

    /// Draw triangle `prim_index` of submesh `draw_index` in `color`.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] if the triangle does not
    /// exist or no uniform slot is left.
    pub fn draw_primitive(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        queue: &wgpu::Queue,
        mesh: &GpuMesh,
        wvp: Mat4,
        color: [f32; 4],
        (draw_index, prim_index): (u32, u32),
    ) -> Result<(), PickviewError> {
        let uniform = SimpleColorDraw {
            wvp: wvp.to_cols_array_2d(),
            color,
        };
        let offset = self.draws.push(queue, &uniform)?;
        self.bind(pass);
        self.draws.bind(pass, self.draw_location.group, offset);
        mesh.render_primitive(pass, draw_index, prim_index)
    }
}

impl Technique for SimpleColorTechnique {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<SimpleColorDraw>(), 80);
    }
}
