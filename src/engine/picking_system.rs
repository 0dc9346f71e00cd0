use glam::Mat4;

use crate::error::PickviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::mesh::GpuMesh;
use crate::picking::{resolve_click, Pick, PickingTexture, Selection};
use crate::scene::{Scene, WorldTransform};
use crate::technique::{PickingTechnique, Technique};

/// ID framebuffer, the technique that fills it, and the current selection.
pub(crate) struct PickingSystem {
    /// The `Rgba32Uint` ID attachment and its depth buffer.
    pub(crate) texture: PickingTexture,
    /// Writes object, draw, and primitive IDs.
    pub(crate) technique: PickingTechnique,
    /// Result of the last pick that hit an object.
    pub(crate) selection: Option<Selection>,
}

impl PickingSystem {
    /// Create the ID framebuffer at the surface size and the picking
    /// pipeline, with primitive indices when the device supports them.
    pub(crate) fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, PickviewError> {
        let texture = PickingTexture::new(
            &context.device,
            context.width(),
            context.height(),
        )?;
        let technique = PickingTechnique::new(
            &context.device,
            shader_composer,
            context.primitive_index,
        )?;
        if !technique.writes_primitive_index() {
            log::info!(
                "adapter lacks primitive index support; picks report \
                 object and submesh only"
            );
        }
        Ok(Self {
            texture,
            technique,
            selection: None,
        })
    }

    /// Render every placement into the ID framebuffer and submit.
    fn render(
        &mut self,
        context: &RenderContext,
        placements: &[WorldTransform],
        mesh: &GpuMesh,
        view_projection: Mat4,
    ) -> Result<(), PickviewError> {
        self.technique.begin_frame(
            &context.device,
            placements.len() * mesh.submesh_count(),
        );

        let mut encoder = context.create_encoder("Picking Encoder");
        {
            let mut pass = self.texture.enable_writing(&mut encoder);
            self.technique.bind(&mut pass);
            for (i, transform) in placements.iter().enumerate() {
                let mut object = self.technique.object(
                    &context.queue,
                    view_projection * transform.matrix(),
                    Scene::pick_index(i),
                );
                mesh.render(&mut pass, &mut object)?;
            }
            PickingTexture::disable_writing(pass);
        }
        context.submit(encoder);
        Ok(())
    }

    /// Resolve the cursor against a freshly rendered ID framebuffer and make
    /// the result the current selection. Out-of-bounds cursors are rejected
    /// before anything is rendered.
    pub(crate) fn pick(
        &mut self,
        context: &RenderContext,
        scene: &Scene,
        mesh: &GpuMesh,
        view_projection: Mat4,
        cursor: (f32, f32),
    ) -> Result<Pick, PickviewError> {
        let pick = resolve_click(
            cursor,
            self.texture.extent(),
            PickingTexture::ORIGIN,
            |x, y| {
                self.render(context, scene.placements(), mesh, view_projection)?;
                self.texture
                    .read_pixel(&context.device, &context.queue, x, y)
            },
        )?;
        if pick.selection != self.selection {
            log::debug!("selection {:?} -> {:?}", self.selection, pick.selection);
        }
        self.selection = pick.selection;
        Ok(pick)
    }
}
