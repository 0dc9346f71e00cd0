//! GPU object picking on wgpu.
//!
//! Every object is drawn a second time into an offscreen `Rgba32Uint`
//! framebuffer that stores, per pixel, the object index (offset by one so
//! zero means background), the submesh draw index, and the primitive index.
//! A click reads back the single texel under the cursor and resolves it to
//! a [`picking::Selection`], which the lit pass then tints and whose
//! triangle it outlines.
//!
//! # Key entry points
//!
//! - [`PickEngine`] - owns the GPU context, the scene, and every pass
//! - [`picking::PickingTexture`] - the ID framebuffer and its readback
//! - [`picking::resolve_click`] - cursor to texel to selection
//! - [`options::Options`] - TOML-backed configuration
//! - [`Viewer`] - a winit window around the engine (feature `viewer`)
//!
//! # Frame
//!
//! While the left button is held, each frame renders the ID pass, reads the
//! texel under the cursor (blocking on the device), and updates the
//! selection. The lit pass follows, with the highlight overlay drawn on top
//! at `LessEqual` depth.

// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod options;
pub mod picking;
pub mod scene;
pub mod technique;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{EngineCommand, PickEngine};
pub use error::PickviewError;
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;
pub use picking::{Pick, PixelInfo, Selection};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
