//! Shader program wrappers.
//!
//! A technique pairs a composed [`ShaderProgram`] with the pipeline state it
//! is drawn with and the per-draw uniform storage it binds. Techniques check
//! at construction that every uniform they bind exists in their shader.

mod lighting;
mod picking;
mod program;
mod simple_color;

pub use lighting::{LightUniform, LightingDraw, LightingTechnique, LitObject};
pub use picking::{PickingDraw, PickingObject, PickingTechnique};
pub use program::{reflect_uniforms, ShaderProgram, UniformLocation};
pub use simple_color::{SimpleColorDraw, SimpleColorTechnique};

use crate::error::PickviewError;

/// Common surface of every technique.
pub trait Technique {
    /// The composed shader program.
    fn program(&self) -> &ShaderProgram;

    /// The render pipeline drawn with.
    fn pipeline(&self) -> &wgpu::RenderPipeline;

    /// Make this technique's pipeline current on `pass`.
    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(self.pipeline());
    }

    /// Location of a named uniform in the program, if present.
    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.program().uniform_location(name)
    }
}

/// Hook invoked by [`GpuMesh::render`](crate::mesh::GpuMesh::render)
/// before each submesh is drawn.
pub trait DrawCallbacks {
    /// Bind whatever the draw of submesh `draw_index` needs.
    ///
    /// # Errors
    ///
    /// Implementations fail when per-draw uniform storage is exhausted.
    fn draw_start(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        draw_index: u32,
    ) -> Result<(), PickviewError>;
}
