use crate::error::PickviewError;

/// Which edge of the framebuffer row 0 lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrigin {
    /// Row 0 is the top row, like window coordinates and wgpu textures.
    #[default]
    TopLeft,
    /// Row 0 is the bottom row (OpenGL framebuffers).
    BottomLeft,
}

/// Convert a cursor position (physical pixels, top-left origin) into the
/// texel of a `width x height` framebuffer with the given row origin.
///
/// Fractional positions select the texel they fall inside.
///
/// # Errors
///
/// Returns [`PickviewError::OutOfBounds`] when the position lies outside
/// `[0, width) x [0, height)` or is not finite.
pub fn to_framebuffer(
    (x, y): (f32, f32),
    (width, height): (u32, u32),
    origin: RowOrigin,
) -> Result<(u32, u32), PickviewError> {
    let column = x.floor() as i64;
    let row = y.floor() as i64;
    let inside = x.is_finite()
        && y.is_finite()
        && (0..i64::from(width)).contains(&column)
        && (0..i64::from(height)).contains(&row);
    if !inside {
        return Err(PickviewError::OutOfBounds {
            x: column,
            y: row,
            width,
            height,
        });
    }

    let (column, row) = (column as u32, row as u32);
    Ok(match origin {
        RowOrigin::TopLeft => (column, row),
        RowOrigin::BottomLeft => (column, height - row - 1),
    })
}
