//! GPU object picking.
//!
//! The picking pass renders `(object_id, draw_id, prim_id)` for every
//! fragment into an offscreen ID framebuffer. A click is resolved by reading
//! back the single texel under the cursor:
//!
//! - `object_id == 0` -> background, no selection
//! - otherwise `object_id - 1` is the placement index, `draw_id` the
//!   submesh, and `prim_id - 1` the triangle within it (`prim_id == 0`
//!   means the primitive is unknown)

mod coords;
mod pixel;
mod selection;
mod texture;

#[cfg(test)]
mod id_image;

pub use coords::{to_framebuffer, RowOrigin};
pub use pixel::{PixelInfo, TEXEL_BYTES};
pub use selection::Selection;
pub use texture::{PickingTexture, ID_FORMAT};

use crate::error::PickviewError;

/// A click resolved against the ID framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// Framebuffer texel that was read.
    pub texel: (u32, u32),
    /// Raw texel contents.
    pub pixel: PixelInfo,
    /// What the texel identifies, `None` for background.
    pub selection: Option<Selection>,
}

/// Resolve a cursor position (physical pixels, top-left origin) against a
/// `width x height` framebuffer whose rows start at `origin`.
///
/// `read` is handed framebuffer coordinates that are already known to be in
/// bounds.
///
/// # Errors
///
/// Returns [`PickviewError::OutOfBounds`] for a cursor outside the
/// framebuffer, without calling `read`; otherwise propagates `read`'s error.
pub fn resolve_click(
    cursor: (f32, f32),
    extent: (u32, u32),
    origin: RowOrigin,
    read: impl FnOnce(u32, u32) -> Result<PixelInfo, PickviewError>,
) -> Result<Pick, PickviewError> {
    let (x, y) = to_framebuffer(cursor, extent, origin)?;
    let pixel = read(x, y)?;
    Ok(Pick {
        texel: (x, y),
        pixel,
        selection: Selection::resolve(pixel),
    })
}
