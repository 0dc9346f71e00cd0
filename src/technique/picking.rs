use glam::Mat4;

use super::{DrawCallbacks, ShaderProgram, Technique, UniformLocation};
use crate::error::PickviewError;
use crate::gpu::pipeline_helpers::{create_mesh_pipeline, MeshPipelineDesc};
use crate::gpu::shader_composer::{ShaderComposer, PRIMITIVE_INDEX_DEF};
use crate::gpu::uniform_ring::UniformRing;
use crate::picking::ID_FORMAT;

/// Per-draw uniform of the picking pass (`u_draw` in `picking.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PickingDraw {
    /// Projection * View * World.
    pub wvp: [[f32; 4]; 4],
    /// 1-based object index; 0 is reserved for the background.
    pub object_index: u32,
    /// Submesh index within the mesh.
    pub draw_index: u32,
    _pad: [u32; 2],
}

/// Writes `(object_index, draw_index, primitive + 1)` into the ID
/// framebuffer. Depth test `Less`, back faces culled.
pub struct PickingTechnique {
    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    draws: UniformRing<PickingDraw>,
    draw_location: UniformLocation,
    primitive_index: bool,
}

impl PickingTechnique {
    /// Build the picking pipeline. With `primitive_index` the fragment
    /// shader reads `@builtin(primitive_index)`; without it `prim_id` is
    /// always 0.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] or
    /// [`PickviewError::MissingUniform`].
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        primitive_index: bool,
    ) -> Result<Self, PickviewError> {
        let defs: &[&str] = if primitive_index {
            &[PRIMITIVE_INDEX_DEF]
        } else {
            &[]
        };
        let program = ShaderProgram::new(
            device,
            composer,
            "Picking",
            (include_str!("../../assets/shaders/picking.wgsl"), "picking.wgsl"),
            defs,
        )?;
        let draw_location = program.require("u_draw")?;

        let draws = UniformRing::new(
            device,
            "Picking Draws",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let pipeline = create_mesh_pipeline(
            device,
            program.module(),
            &[draws.layout()],
            &MeshPipelineDesc {
                label: "Picking",
                format: ID_FORMAT,
                ..Default::default()
            },
        );

        Ok(Self {
            program,
            pipeline,
            draws,
            draw_location,
            primitive_index,
        })
    }

    /// Whether `prim_id` carries real primitive indices.
    pub fn writes_primitive_index(&self) -> bool {
        self.primitive_index
    }

    /// Reserve uniform slots for `draws` draw calls this frame.
    pub fn begin_frame(&mut self, device: &wgpu::Device, draws: usize) {
        let _ = self.draws.begin_frame(device, draws);
    }

    /// Callbacks drawing one object with the given matrix and 1-based
    /// index.
    pub fn object<'a>(
        &'a mut self,
        queue: &'a wgpu::Queue,
        wvp: Mat4,
        object_index: u32,
    ) -> PickingObject<'a> {
        PickingObject {
            technique: self,
            queue,
            wvp,
            object_index,
        }
    }
}

impl Technique for PickingTechnique {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// Binds `(wvp, object_index, draw_index)` before each submesh of one
/// object.
pub struct PickingObject<'a> {
    technique: &'a mut PickingTechnique,
    queue: &'a wgpu::Queue,
    wvp: Mat4,
    object_index: u32,
}

impl DrawCallbacks for PickingObject<'_> {
    fn draw_start(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        draw_index: u32,
    ) -> Result<(), PickviewError> {
        let uniform = PickingDraw {
            wvp: self.wvp.to_cols_array_2d(),
            object_index: self.object_index,
            draw_index,
            _pad: [0; 2],
        };
        let offset = self.technique.draws.push(self.queue, &uniform)?;
        self.technique
            .draws
            .bind(pass, self.technique.draw_location.group, offset);
        Ok(())
    }
}
