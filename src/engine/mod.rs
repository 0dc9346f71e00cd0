//! The engine: GPU context, scene, passes, and per-frame picking.

pub(crate) mod command;
pub(crate) mod picking_system;

use glam::Mat4;

pub use self::command::EngineCommand;
use self::picking_system::PickingSystem;
use crate::camera::controller::CameraController;
use crate::error::PickviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;
use crate::input::{InputEvent, InputProcessor};
use crate::mesh::GpuMesh;
use crate::options::Options;
use crate::picking::{Pick, Selection};
use crate::scene::Scene;
use crate::technique::{LightingTechnique, SimpleColorTechnique, Technique};
use crate::util::frame_timing::FrameTiming;

/// The picking viewer engine.
///
/// Owns the GPU context, the scene, and one technique per pass: the ID
/// pass that resolves clicks, the lit pass that draws the scene with the
/// selected object tinted, and the overlay pass that highlights the picked
/// triangle.
pub struct PickEngine {
    context: RenderContext,
    options: Options,
    camera: CameraController,
    input: InputProcessor,
    scene: Scene,
    mesh: GpuMesh,
    picking: PickingSystem,
    lighting: LightingTechnique,
    highlight: SimpleColorTechnique,
    depth: RenderTarget,
    /// Click released before any frame picked it.
    pending_pick: Option<(f32, f32)>,
    quit: bool,
    /// Frame pacing for the viewer's redraw loop.
    pub frame_timing: FrameTiming,
}

impl PickEngine {
    /// Create an engine drawing to `window`.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::Gpu`] if no adapter or device is available,
    /// or any shader, mesh, or framebuffer error from
    /// [`with_context`](Self::with_context).
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, PickviewError> {
        let context = RenderContext::new(window, size).await?;
        Self::with_context(context, options)
    }

    /// Create an engine on an existing context. With a headless context the
    /// engine can still pick through [`pick_at`](Self::pick_at).
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] or
    /// [`PickviewError::MissingUniform`] if a technique fails to build,
    /// [`PickviewError::InvalidArgument`] for a malformed scene mesh, and
    /// [`PickviewError::RenderResource`] if the ID framebuffer cannot be
    /// allocated.
    pub fn with_context(
        context: RenderContext,
        options: Options,
    ) -> Result<Self, PickviewError> {
        let mut composer = ShaderComposer::new()?;
        let size = (context.width(), context.height());

        let scene = Scene::from_options(&options.scene);
        let mesh =
            GpuMesh::upload(&context.device, "Scene Mesh", scene.mesh())?;
        let picking = PickingSystem::new(&context, &mut composer)?;
        let lighting = LightingTechnique::new(
            &context.device,
            &mut composer,
            context.format(),
            &options.lighting,
        )?;
        let highlight = SimpleColorTechnique::new(
            &context.device,
            &mut composer,
            context.format(),
        )?;
        let depth = RenderTarget::depth(&context.device, "Main Depth", size);

        let mut input = InputProcessor::default();
        input.set_key_bindings(options.keybindings.clone());

        log::info!(
            "scene ready: {} objects, {} submeshes, {} triangles each",
            scene.len(),
            mesh.submesh_count(),
            scene.mesh().triangle_count()
        );

        Ok(Self {
            camera: CameraController::new(&options.camera, size),
            frame_timing: FrameTiming::new(options.window.target_fps),
            context,
            options,
            input,
            scene,
            mesh,
            picking,
            lighting,
            highlight,
            depth,
            pending_pick: None,
            quit: false,
        })
    }

    /// Resize the surface and every size-dependent target.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.camera.resize(width, height);
        self.depth = RenderTarget::depth(
            &self.context.device,
            "Main Depth",
            (width, height),
        );
        if let Err(e) =
            self.picking.texture.resize(&self.context.device, width, height)
        {
            log::warn!("picking framebuffer not resized: {e}");
        }
    }

    /// Translate a platform event into commands and apply them.
    pub fn handle_input(&mut self, event: InputEvent) {
        for command in self.input.handle_event(event) {
            self.execute(command);
        }
    }

    /// Apply one command.
    pub fn execute(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Camera(action) => {
                let _ = self.camera.on_action(action);
            }
            EngineCommand::Look { delta } => self.camera.look(delta),
            EngineCommand::CursorAt { x, y } => self.camera.on_cursor(x, y),
            EngineCommand::PickOnce { x, y } => {
                self.pending_pick = Some((x, y));
            }
            EngineCommand::ClearSelection => self.picking.selection = None,
            EngineCommand::Resize { width, height } => {
                self.resize(width, height);
            }
            EngineCommand::Quit => self.quit = true,
        }
    }

    /// Render the ID buffer at window pixel `(x, y)`, resolve it, and make
    /// the result the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::OutOfBounds`] if `(x, y)` lies outside the
    /// surface (nothing is rendered), or the draw or readback error.
    pub fn pick_at(&mut self, x: f32, y: f32) -> Result<Pick, PickviewError> {
        let view_projection = self.camera.camera.view_projection();
        self.picking.pick(
            &self.context,
            &self.scene,
            &self.mesh,
            view_projection,
            (x, y),
        )
    }

    /// Draw one frame: pick if a click is active, then the lit scene with
    /// the selection highlighted.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain texture cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }
        self.camera.on_render();

        let request =
            next_pick(self.input.pick_frame(), &mut self.pending_pick);
        if let Some((x, y)) =
            request.filter(|_| self.options.picking.enabled)
        {
            match self.pick_at(x, y) {
                Ok(pick) => log::debug!("pick at ({x}, {y}): {pick:?}"),
                Err(e) => log::warn!("pick at ({x}, {y}) skipped: {e}"),
            }
        }

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        if let Err(e) = self.render_to(&view) {
            log::warn!("scene pass incomplete: {e}");
        }
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Draw the lit scene with the current selection into `view` and
    /// submit. `view` must have the surface format and size.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] if the picked triangle no
    /// longer exists in its submesh or a draw runs out of uniform slots.
    /// Draws recorded before the failure are still submitted.
    pub fn render_to(
        &mut self,
        view: &wgpu::TextureView,
    ) -> Result<(), PickviewError> {
        let mut encoder = self.context.create_encoder("Render Encoder");
        let result = self.encode_scene(&mut encoder, view);
        self.context.submit(encoder);
        result
    }

    /// Lit pass over every placement plus the triangle overlay.
    fn encode_scene(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) -> Result<(), PickviewError> {
        let view_projection = self.camera.camera.view_projection();
        let placements = self.scene.placements();
        let selection = self.picking.selection;
        let [r, g, b, a] = self.options.window.clear_color;

        self.lighting.begin_frame(
            &self.context.device,
            placements.len() * self.mesh.submesh_count(),
        );
        self.highlight.begin_frame(&self.context.device, 1);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(r),
                        g: f64::from(g),
                        b: f64::from(b),
                        a: f64::from(a),
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.lighting.bind(&mut pass);
        for (i, transform) in placements.iter().enumerate() {
            let tint = match selection {
                Some(s) if s.object == i => self.options.picking.selected_tint,
                _ => [1.0; 4],
            };
            let mut object = self.lighting.object(
                &self.context.queue,
                view_projection,
                transform.matrix(),
                self.mesh.colors(),
                tint,
            );
            self.mesh.render(&mut pass, &mut object)?;
        }

        let Some((selected, triangle)) =
            selection.and_then(|s| Some((s.object, s.triangle()?)))
        else {
            return Ok(());
        };
        let Some(transform) = placements.get(selected) else {
            return Ok(());
        };
        self.highlight.draw_primitive(
            &mut pass,
            &self.context.queue,
            &self.mesh,
            view_projection * transform.matrix(),
            self.options.picking.highlight_color,
            triangle,
        )
    }

    /// The current selection, if the last pick hit an object.
    pub fn selection(&self) -> Option<Selection> {
        self.picking.selection
    }

    /// Whether a `Quit` command has been executed.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// The options currently in effect.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Apply new options. Lighting, picking, key bindings, clear color, and
    /// frame pacing take effect immediately; camera and scene sections are
    /// read only when the engine is built.
    pub fn set_options(&mut self, options: Options) {
        self.lighting.set_light(&self.context.queue, &options.lighting);
        self.input.set_key_bindings(options.keybindings.clone());
        if options.window.target_fps != self.frame_timing.target_fps() {
            self.frame_timing = FrameTiming::new(options.window.target_fps);
        }
        if !options.picking.enabled {
            self.pending_pick = None;
        }
        self.options = options;
    }

    /// The current camera view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.camera.camera.view_projection()
    }

    /// The current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.context.width(), self.context.height())
    }

    /// The device, queue, and surface configuration drawn with.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

/// The click to resolve this frame: the held button's position, else a
/// click released since the last frame. Either way the released click is
/// consumed.
fn next_pick(
    held: Option<(f32, f32)>,
    pending: &mut Option<(f32, f32)>,
) -> Option<(f32, f32)> {
    let released = pending.take();
    held.or(released)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_button_consumes_released_click() {
        let mut pending = Some((1.0, 2.0));
        assert_eq!(next_pick(Some((5.0, 6.0)), &mut pending), Some((5.0, 6.0)));
        assert_eq!(pending, None);
        assert_eq!(next_pick(None, &mut pending), None);
    }

    #[test]
    fn released_click_is_picked_once() {
        let mut pending = Some((1.0, 2.0));
        assert_eq!(next_pick(None, &mut pending), Some((1.0, 2.0)));
        assert_eq!(next_pick(None, &mut pending), None);
    }
}
