//! Centralized options with TOML preset support.
//!
//! Window, camera, lighting, scene, picking, and keybinding settings are
//! consolidated here. Options serialize to/from TOML so a viewer can be
//! started from a preset file.

mod camera;
mod keybindings;
mod lighting;
mod picking;
mod scene;
mod window;

use std::path::Path;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use picking::PickingOptions;
pub use scene::{MeshKind, PlacementOptions, SceneOptions};
use serde::{Deserialize, Serialize};
pub use window::WindowOptions;

use crate::error::PickviewError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Window size, title, and frame pacing.
    pub window: WindowOptions,
    /// Camera projection and first-person controls.
    pub camera: CameraOptions,
    /// Directional light parameters.
    pub lighting: LightingOptions,
    /// Mesh and object placements.
    pub scene: SceneOptions,
    /// Picking and highlight parameters.
    pub picking: PickingOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::OptionsParse`] for malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, PickviewError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| PickviewError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::Io`] if the file cannot be read and
    /// [`PickviewError::OptionsParse`] for malformed TOML.
    pub fn load(path: &Path) -> Result<Self, PickviewError> {
        let content = std::fs::read_to_string(path).map_err(PickviewError::Io)?;
        let opts = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(opts)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::OptionsParse`] if serialization fails and
    /// [`PickviewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), PickviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PickviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PickviewError::Io)?;
        }
        std::fs::write(path, content).map_err(PickviewError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
ambient_intensity = 0.1
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.ambient_intensity, 0.1);
        // Everything else should be default
        assert_eq!(opts.lighting.diffuse_intensity, 0.7);
        assert_eq!(opts.window.width, 1920);
        assert_eq!(opts.scene.placements.len(), 3);
    }

    #[test]
    fn placements_parse_from_array_of_tables() {
        let toml_str = r#"
[scene]
mesh = "cube"

[[scene.placements]]
position = [1.0, 2.0, 3.0]

[[scene.placements]]
position = [0.0, 0.0, 10.0]
rotation = [0.0, 45.0, 0.0]
scale = 2.0
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.scene.mesh, MeshKind::Cube);
        assert_eq!(opts.scene.placements.len(), 2);
        assert_eq!(opts.scene.placements[0].scale, 1.0);
        assert_eq!(opts.scene.placements[1].rotation, [0.0, 45.0, 0.0]);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[window\nwidth = ").unwrap_err();
        assert!(matches!(err, PickviewError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        use crate::input::KeyAction;
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("KeyW"), Some(KeyAction::MoveForward));
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Quit));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn rebound_key_survives_parsing() {
        use crate::input::KeyAction;
        let toml_str = r#"
[keybindings.bindings]
move_forward = "ArrowUp"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("ArrowUp"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("pickview-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.window.title = "saved".to_owned();
        opts.save(&dir.join("b.toml")).unwrap();
        Options::default().save(&dir.join("a.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["a", "b"]);
        let loaded = Options::load(&dir.join("b.toml")).unwrap();
        assert_eq!(loaded, opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err =
            Options::load(Path::new("/nonexistent/pickview.toml")).unwrap_err();
        assert!(matches!(err, PickviewError::Io(_)));
    }
}
