use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::{DrawCallbacks, ShaderProgram, Technique, UniformLocation};
use crate::error::PickviewError;
use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, uniform_buffer, MeshPipelineDesc,
};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::uniform_ring::UniformRing;
use crate::options::LightingOptions;

/// Per-draw uniform of the lit pass (`u_draw` in `lighting.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingDraw {
    /// Projection * View * World.
    pub wvp: [[f32; 4]; 4],
    /// World matrix, used to rotate normals.
    pub world: [[f32; 4]; 4],
    /// Linear RGBA surface color.
    pub color: [f32; 4],
}

/// Directional light (`u_light`, `DirectionalLight` in the lighting
/// module).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Light color.
    pub color: [f32; 3],
    /// Ambient term scale.
    pub ambient_intensity: f32,
    /// Direction the light travels, world space.
    pub direction: [f32; 3],
    /// Diffuse term scale.
    pub diffuse_intensity: f32,
}

impl From<&LightingOptions> for LightUniform {
    fn from(opts: &LightingOptions) -> Self {
        Self {
            color: opts.color,
            ambient_intensity: opts.ambient_intensity,
            direction: Vec3::from(opts.direction)
                .try_normalize()
                .unwrap_or(Vec3::NEG_X)
                .to_array(),
            diffuse_intensity: opts.diffuse_intensity,
        }
    }
}

/// Forward shading with one directional light and a flat color per
/// submesh.
pub struct LightingTechnique {
    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    draws: UniformRing<LightingDraw>,
    draw_location: UniformLocation,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    light_location: UniformLocation,
}

impl LightingTechnique {
    /// Build the lit pipeline rendering into `format`.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] or
    /// [`PickviewError::MissingUniform`].
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        light: &LightingOptions,
    ) -> Result<Self, PickviewError> {
        let program = ShaderProgram::new(
            device,
            composer,
            "Lighting",
            (
                include_str!("../../assets/shaders/lighting.wgsl"),
                "lighting.wgsl",
            ),
            &[],
        )?;
        let draw_location = program.require("u_draw")?;
        let light_location = program.require("u_light")?;

        let draws = UniformRing::new(
            device,
            "Lighting Draws",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let light_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Light Uniform"),
                contents: bytemuck::bytes_of(&LightUniform::from(light)),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let light_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Light Layout"),
                entries: &[uniform_buffer(light_location.binding)],
            });
        let light_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Light Bind Group"),
                layout: &light_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: light_location.binding,
                    resource: light_buffer.as_entire_binding(),
                }],
            });

        let pipeline = create_mesh_pipeline(
            device,
            program.module(),
            &[draws.layout(), &light_layout],
            &MeshPipelineDesc {
                label: "Lighting",
                format,
                ..Default::default()
            },
        );

        Ok(Self {
            program,
            pipeline,
            draws,
            draw_location,
            light_buffer,
            light_bind_group,
            light_location,
        })
    }

    /// Upload new light parameters.
    pub fn set_light(&self, queue: &wgpu::Queue, light: &LightingOptions) {
        queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::bytes_of(&LightUniform::from(light)),
        );
    }

    /// Reserve uniform slots for `draws` draw calls this frame.
    pub fn begin_frame(&mut self, device: &wgpu::Device, draws: usize) {
        let _ = self.draws.begin_frame(device, draws);
    }

    /// Callbacks drawing one object. `colors` holds the material color of
    /// each submesh; every color is multiplied by `tint`.
    pub fn object<'a>(
        &'a mut self,
        queue: &'a wgpu::Queue,
        view_projection: Mat4,
        world: Mat4,
        colors: &'a [[f32; 4]],
        tint: [f32; 4],
    ) -> LitObject<'a> {
        LitObject {
            technique: self,
            queue,
            wvp: view_projection * world,
            world,
            colors,
            tint,
        }
    }
}

impl Technique for LightingTechnique {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(
            self.light_location.group,
            &self.light_bind_group,
            &[],
        );
    }
}

/// Binds matrices and the submesh color before each draw of one object.
pub struct LitObject<'a> {
    technique: &'a mut LightingTechnique,
    queue: &'a wgpu::Queue,
    wvp: Mat4,
    world: Mat4,
    colors: &'a [[f32; 4]],
    tint: [f32; 4],
}

impl DrawCallbacks for LitObject<'_> {
    fn draw_start(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        draw_index: u32,
    ) -> Result<(), PickviewError> {
        let base = self
            .colors
            .get(draw_index as usize)
            .copied()
            .unwrap_or([1.0; 4]);
        let color = std::array::from_fn(|i| base[i] * self.tint[i]);
        let uniform = LightingDraw {
            wvp: self.wvp.to_cols_array_2d(),
            world: self.world.to_cols_array_2d(),
            color,
        };
        let offset = self.technique.draws.push(self.queue, &uniform)?;
        self.technique
            .draws
            .bind(pass, self.technique.draw_location.group, offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_match_wgsl_layout() {
        assert_eq!(size_of::<LightingDraw>(), 144);
        assert_eq!(size_of::<LightUniform>(), 32);
    }

    #[test]
    fn light_direction_is_normalized() {
        let opts = LightingOptions {
            direction: [-4.0, 0.0, 0.0],
            ..Default::default()
        };
        let uniform = LightUniform::from(&opts);
        assert_eq!(uniform.direction, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_direction_falls_back_to_default_axis() {
        let opts = LightingOptions {
            direction: [0.0; 3],
            ..Default::default()
        };
        assert_eq!(LightUniform::from(&opts).direction, [-1.0, 0.0, 0.0]);
    }
}
