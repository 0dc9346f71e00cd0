//! Camera system for 3D scene viewing.
//!
//! Provides a first-person camera with keyboard movement, right-drag mouse
//! look, and optional edge scrolling.

/// First-person controller driving the camera from input.
pub mod controller;
/// Core camera struct and matrix construction.
pub mod core;
