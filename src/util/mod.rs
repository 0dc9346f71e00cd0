//! Shared utilities for the engine.

/// Frame pacing and FPS smoothing.
pub mod frame_timing;
