//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render targets, per-draw
//! uniform storage, pipeline boilerplate, and shader composition.

/// Shared wgpu boilerplate for mesh pipelines and bind group layouts.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Render-target texture abstraction.
pub mod texture;
/// Dynamic-offset uniform buffer with one aligned slot per draw.
pub mod uniform_ring;
