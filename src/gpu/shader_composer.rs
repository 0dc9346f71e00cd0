use std::borrow::Cow;
use std::collections::HashMap;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderDefValue,
    ShaderLanguage, ShaderType,
};

use crate::error::PickviewError;

/// Shader def enabling `@builtin(primitive_index)` in the picking shader.
pub const PRIMITIVE_INDEX_DEF: &str = "PRIMITIVE_INDEX";

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` and `#ifdef` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming shaders
/// use `#import pickview::module_name::{item}` to pull in shared code. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/transform.wgsl"),
        file_path: "modules/transform.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

fn compile_error(file_path: &str, log: impl ToString) -> PickviewError {
    PickviewError::ShaderCompilation {
        file: file_path.to_owned(),
        log: log.to_string(),
    }
}

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] if a shared module fails
    /// to parse.
    pub fn new() -> Result<Self, PickviewError> {
        let capabilities = naga::valid::Capabilities::default()
            | naga::valid::Capabilities::PRIMITIVE_INDEX;
        let mut composer = Composer::default().with_capabilities(capabilities);

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| compile_error(m.file_path, e))?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. `defs` are enabled as boolean shader defs.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::ShaderCompilation`] carrying the composer log.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
        defs: &[&str],
    ) -> Result<naga::Module, PickviewError> {
        let shader_defs: HashMap<String, ShaderDefValue> = defs
            .iter()
            .map(|d| ((*d).to_owned(), ShaderDefValue::Bool(true)))
            .collect();

        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(|e| compile_error(file_path, e))
    }

    /// Hand a composed module to the device.
    pub fn create_module(
        device: &wgpu::Device,
        label: &str,
        module: naga::Module,
    ) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (source, file_path) of every technique shader.
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                include_str!("../../assets/shaders/picking.wgsl"),
                "picking.wgsl",
            ),
            (
                include_str!("../../assets/shaders/lighting.wgsl"),
                "lighting.wgsl",
            ),
            (
                include_str!("../../assets/shaders/simple_color.wgsl"),
                "simple_color.wgsl",
            ),
        ]
    }

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let _ = composer
                .compose_naga(source, file_path, &[])
                .unwrap_or_else(|e| panic!("{e}"));
        }
    }

    #[test]
    fn picking_shader_composes_with_primitive_index() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer
            .compose_naga(
                include_str!("../../assets/shaders/picking.wgsl"),
                "picking.wgsl",
                &[PRIMITIVE_INDEX_DEF],
            )
            .unwrap();
        let fs = module
            .entry_points
            .iter()
            .find(|ep| ep.name == "fs_main")
            .unwrap();
        let reads_primitive_index = fs.function.arguments.iter().any(|arg| {
            matches!(
                arg.binding,
                Some(naga::Binding::BuiltIn(naga::BuiltIn::PrimitiveIndex))
            )
        });
        assert!(reads_primitive_index);
    }

    #[test]
    fn broken_source_reports_file() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_naga("fn broken( {", "broken.wgsl", &[])
            .unwrap_err();
        match err {
            PickviewError::ShaderCompilation { file, .. } => {
                assert_eq!(file, "broken.wgsl");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
