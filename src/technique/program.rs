use std::collections::HashMap;

use crate::error::PickviewError;
use crate::gpu::shader_composer::ShaderComposer;

/// Bind point of a named resource global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    /// `@group` index.
    pub group: u32,
    /// `@binding` index within the group.
    pub binding: u32,
}

/// A composed shader module plus the bind points of its named globals.
pub struct ShaderProgram {
    name: &'static str,
    module: wgpu::ShaderModule,
    uniforms: HashMap<String, UniformLocation>,
}

/// Every named global with a resource binding in `module`.
#[must_use]
pub fn reflect_uniforms(
    module: &naga::Module,
) -> HashMap<String, UniformLocation> {
    module
        .global_variables
        .iter()
        .filter_map(|(_, global)| {
            let name = global.name.clone()?;
            let binding = global.binding.as_ref()?;
            Some((
                name,
                UniformLocation {
                    group: binding.group,
                    binding: binding.binding,
                },
            ))
        })
        .collect()
}

impl ShaderProgram {
    /// Compose `source` with the given shader defs and create the wgpu
    /// module.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] if composition or
    /// validation fails.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        name: &'static str,
        (source, file_path): (&str, &str),
        defs: &[&str],
    ) -> Result<Self, PickviewError> {
        let naga_module = composer.compose_naga(source, file_path, defs)?;
        let uniforms = reflect_uniforms(&naga_module);
        log::debug!(
            "{name}: composed with defs {defs:?}, {} bindings",
            uniforms.len()
        );
        let module = ShaderComposer::create_module(device, name, naga_module);
        Ok(Self {
            name,
            module,
            uniforms,
        })
    }

    /// Program name used in labels and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wgpu shader module.
    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    /// Location of the global called `name`.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }

    /// Like [`uniform_location`](Self::uniform_location) but missing
    /// globals are an error.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::MissingUniform`].
    pub fn require(
        &self,
        name: &'static str,
    ) -> Result<UniformLocation, PickviewError> {
        self.uniform_location(name)
            .ok_or(PickviewError::MissingUniform {
                technique: self.name,
                name,
            })
    }
}
