//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the pickview crate.
#[derive(Debug)]
pub enum PickviewError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A GPU render resource could not be allocated.
    RenderResource {
        /// Which resource failed (e.g. `"picking texture"`).
        resource: &'static str,
        /// Status describing why the attachment is unusable.
        status: String,
    },
    /// WGSL composition or validation failed.
    ShaderCompilation {
        /// Shader file path as registered with the composer.
        file: String,
        /// Composer / validator log.
        log: String,
    },
    /// A technique's shader lacks a uniform it binds every frame.
    MissingUniform {
        /// Technique name.
        technique: &'static str,
        /// Name of the missing uniform global.
        name: &'static str,
    },
    /// Pixel coordinates outside the framebuffer.
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Framebuffer width.
        width: u32,
        /// Framebuffer height.
        height: u32,
    },
    /// A caller passed an argument the operation cannot accept.
    InvalidArgument(String),
    /// Mapping or polling the readback buffer failed.
    Readback(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for PickviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::RenderResource { resource, status } => {
                write!(f, "{resource} incomplete: {status}")
            }
            Self::ShaderCompilation { file, log } => {
                write!(f, "shader '{file}' failed to compile: {log}")
            }
            Self::MissingUniform { technique, name } => {
                write!(f, "{technique}: uniform '{name}' not found in shader")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "pixel ({x}, {y}) outside {width}x{height} framebuffer"
            ),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Readback(msg) => write!(f, "readback failed: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for PickviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for PickviewError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for PickviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
